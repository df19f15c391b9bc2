use clap::{Parser, ValueEnum};
use log::LevelFilter;
use sable_renderer::{RenderConfig, SeedingPolicy, TileOrder};
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneChoice {
    /// Ground plus diffuse, glass and metal spheres
    ThreeSpheres,
    /// Random field of small spheres around three large ones
    Cover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    Linear,
    /// Pure Rust lane-batched search over the SoA cache
    Lanes,
    /// Linked `spheres_hit` routine (requires the `ispc` feature)
    Foreign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TileOrderArg {
    RowMajor,
    Spiral,
}

impl From<TileOrderArg> for TileOrder {
    fn from(order: TileOrderArg) -> Self {
        match order {
            TileOrderArg::RowMajor => TileOrder::RowMajor,
            TileOrderArg::Spiral => TileOrder::Spiral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeedingArg {
    PerWorker,
    PerPixel,
}

impl From<SeedingArg> for SeedingPolicy {
    fn from(seeding: SeedingArg) -> Self {
        match seeding {
            SeedingArg::PerWorker => SeedingPolicy::PerWorker,
            SeedingArg::PerPixel => SeedingPolicy::PerPixel,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "sable")]
#[command(about = "Tile-scheduled CPU path tracer for sphere scenes")]
pub struct Args {
    /// JSON render configuration; explicit flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    #[arg(long, value_enum, default_value = "three-spheres")]
    pub scene: SceneChoice,

    #[arg(long, value_enum, default_value = "linear")]
    pub backend: BackendChoice,

    /// Output file (.ppm or .png); PPM goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples_per_pixel: Option<u32>,

    /// Maximum bounce depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    #[arg(long)]
    pub tile_size: Option<u32>,

    #[arg(long, value_enum)]
    pub tile_order: Option<TileOrderArg>,

    /// Worker threads (defaults to available parallelism)
    #[arg(long, short = 'j')]
    pub workers: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum)]
    pub seeding: Option<SeedingArg>,
}

impl Args {
    /// Apply explicit flags on top of `config`.
    pub fn apply_overrides(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(spp) = self.samples_per_pixel {
            config.samples_per_pixel = spp;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(order) = self.tile_order {
            config.tile_order = order.into();
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(seeding) = self.seeding {
            config.seeding = seeding.into();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["sable", "--width", "320", "-s", "8", "--tile-order", "spiral"]);
        let config = args.apply_overrides(RenderConfig::default().with_resolution(100, 50));

        assert_eq!((config.width, config.height), (320, 50));
        assert_eq!(config.samples_per_pixel, 8);
        assert_eq!(config.tile_order, TileOrder::Spiral);
        assert_eq!(config.max_depth, 50);
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["sable"]);
        assert_eq!(args.scene, SceneChoice::ThreeSpheres);
        assert_eq!(args.backend, BackendChoice::Linear);
        assert!(args.output.is_none());
        assert_eq!(args.apply_overrides(RenderConfig::default()), RenderConfig::default());
    }
}
