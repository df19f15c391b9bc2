//! Render configuration.

use crate::scheduler::RenderError;
use crate::tile::TileOrder;
use serde::{Deserialize, Serialize};

/// How per-sample random streams are assigned.
///
/// `PerWorker` gives each worker one stream for its whole run, so the image
/// is reproducible only for a fixed worker count and tile assignment (one
/// worker is always reproducible). `PerPixel` seeds a fresh stream from the
/// pixel coordinates, making the image independent of the worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingPolicy {
    #[default]
    PerWorker,
    PerPixel,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Nominal tile edge in pixels; edge tiles may be smaller
    pub tile_size: u32,
    pub tile_order: TileOrder,
    /// Worker count; `None` uses the available hardware parallelism
    pub workers: Option<usize>,
    /// Base seed every random stream is derived from
    pub seed: u64,
    pub seeding: SeedingPolicy,
    /// Work queue capacity as a multiple of the worker count
    pub queue_slack: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            tile_size: 16,
            tile_order: TileOrder::RowMajor,
            workers: None,
            seed: 42,
            seeding: SeedingPolicy::PerWorker,
            queue_slack: 2,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_tiles(mut self, tile_size: u32, tile_order: TileOrder) -> Self {
        self.tile_size = tile_size;
        self.tile_order = tile_order;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_seed(mut self, seed: u64, seeding: SeedingPolicy) -> Self {
        self.seed = seed;
        self.seeding = seeding;
        self
    }

    /// Width over height, for building a matching camera.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Resolved worker count, at least one.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    /// Bounded work queue capacity.
    pub fn queue_capacity(&self) -> usize {
        self.worker_count() * self.queue_slack.max(1)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.tile_size == 0 {
            return Err(RenderError::InvalidConfig(
                "tile_size must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(RenderError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
