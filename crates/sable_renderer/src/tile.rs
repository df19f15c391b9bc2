//! Tile-based work partitioning.
//!
//! Divides the image into rectangular tiles that are rendered
//! independently by the scheduler's workers.

use crate::config::SeedingPolicy;
use crate::renderer::{render_pixel, WorkerStats};
use crate::sampling::stream_for_pixel;
use crate::{Camera, Color, RenderConfig, Scene};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A rectangular pixel range `[start_x, end_x) x [start_y, end_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
    /// Position of this tile in the dispatch order
    pub index: usize,
}

impl Tile {
    pub fn width(&self) -> u32 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> u32 {
        self.end_y - self.start_y
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width() * self.height()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.start_x..self.end_x).contains(&x) && (self.start_y..self.end_y).contains(&y)
    }
}

/// Order tiles are handed to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileOrder {
    /// Scanline order of tiles, row after row.
    #[default]
    RowMajor,
    /// Nearest to the image center first, so the middle resolves early.
    Spiral,
}

/// Partition a `width x height` raster into tiles of at most `tile_size`.
///
/// Edge tiles are clipped to the raster. Every pixel belongs to exactly one
/// tile whatever the order.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32, order: TileOrder) -> Vec<Tile> {
    assert!(tile_size > 0, "tile_size must be non-zero");

    let mut tiles = Vec::new();
    let mut y = 0;
    while y < height {
        let end_y = height.min(y + tile_size);
        let mut x = 0;
        while x < width {
            let end_x = width.min(x + tile_size);
            tiles.push(Tile {
                start_x: x,
                start_y: y,
                end_x,
                end_y,
                index: tiles.len(),
            });
            x = end_x;
        }
        y = end_y;
    }

    if order == TileOrder::Spiral {
        sort_spiral(&mut tiles, width, height);
        for (i, tile) in tiles.iter_mut().enumerate() {
            tile.index = i;
        }
    }

    tiles
}

/// Sort tiles by distance from image center (stable, ties stay row-major).
fn sort_spiral(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let distance = |t: &Tile| {
        let tx = (t.start_x + t.end_x) as f32 / 2.0;
        let ty = (t.start_y + t.end_y) as f32 / 2.0;
        (tx - center_x).powi(2) + (ty - center_y).powi(2)
    };

    tiles.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Pixels of one rendered tile, row-major within the tile.
#[derive(Debug, Clone)]
pub struct TileResult {
    pub tile: Tile,
    pub pixels: Vec<Color>,
}

/// Render every pixel of `tile`.
///
/// With [`SeedingPolicy::PerWorker`] all samples draw from `rng`; with
/// [`SeedingPolicy::PerPixel`] each pixel gets its own stream and `rng` is
/// left untouched.
pub fn render_tile(
    tile: &Tile,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
    stats: &mut WorkerStats,
) -> TileResult {
    let mut pixels = Vec::with_capacity(tile.pixel_count() as usize);

    for y in tile.start_y..tile.end_y {
        for x in tile.start_x..tile.end_x {
            let color = match config.seeding {
                SeedingPolicy::PerWorker => render_pixel(camera, scene, x, y, config, rng, stats),
                SeedingPolicy::PerPixel => {
                    let mut pixel_rng = stream_for_pixel(config.seed, x, y);
                    render_pixel(camera, scene, x, y, config, &mut pixel_rng, stats)
                }
            };
            pixels.push(color);
        }
    }

    TileResult {
        tile: *tile,
        pixels,
    }
}
