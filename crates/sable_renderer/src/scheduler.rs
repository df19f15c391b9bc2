//! Parallel tile scheduler.
//!
//! A producer thread feeds tiles into a bounded channel; a fixed rayon pool
//! runs one pull loop per thread until the channel closes. Each worker keeps
//! its rendered tiles and counters private, and the coordinator merges them
//! into the image only after every worker has returned.

use crate::image::ImageBuffer;
use crate::renderer::WorkerStats;
use crate::sampling::stream_for_worker;
use crate::tile::{generate_tiles, render_tile, Tile, TileResult};
use crate::{Camera, CameraError, RenderConfig, Scene, SceneError};
use crossbeam_channel::Receiver;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("invalid camera: {0}")]
    Camera(#[from] CameraError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("a render worker panicked")]
    WorkerPanicked,
}

/// Aggregated counters for one finished render.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Indexed by worker
    pub per_worker: Vec<WorkerStats>,
    pub total: WorkerStats,
    pub tiles: usize,
    pub elapsed: Duration,
}

impl RenderStats {
    /// Camera rays plus bounce rays per wall-clock second.
    pub fn rays_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.total.rays + self.total.bounces) as f64 / secs
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
}

/// What one worker hands back at the join.
struct WorkerOutput {
    worker: usize,
    stats: WorkerStats,
    tiles: Vec<TileResult>,
}

/// Render `scene` through `camera` with the tile scheduler.
///
/// The scene is validated up front and shared read-only by every worker.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<RenderOutput, RenderError> {
    config.validate()?;
    scene.validate()?;

    let workers = config.worker_count();
    let tiles = generate_tiles(config.width, config.height, config.tile_size, config.tile_order);
    let tile_count = tiles.len();

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}: {} tiles on {} workers",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        tile_count,
        workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sable-worker-{i}"))
        .build()?;

    let (sender, receiver) = crossbeam_channel::bounded::<Tile>(config.queue_capacity());
    let start = Instant::now();

    let joined = thread::scope(|s| {
        let producer = s.spawn(move || {
            for (sent, tile) in tiles.into_iter().enumerate() {
                log::debug!("{} tiles remaining", tile_count - sent);
                if sender.send(tile).is_err() {
                    // Every worker is gone; nobody left to drain the queue.
                    break;
                }
            }
        });

        let outputs = panic::catch_unwind(AssertUnwindSafe(|| {
            pool.broadcast(|ctx| worker_loop(ctx.index(), &receiver, scene, camera, config))
        }));

        // Unblocks the producer if the workers stopped early.
        drop(receiver);
        let producer_ok = producer.join().is_ok();

        match outputs {
            Ok(outputs) if producer_ok => Ok(outputs),
            _ => Err(RenderError::WorkerPanicked),
        }
    });
    let outputs = joined?;

    let mut image = ImageBuffer::new(config.width, config.height);
    let mut stats = RenderStats {
        per_worker: vec![WorkerStats::default(); workers],
        tiles: tile_count,
        ..RenderStats::default()
    };

    for output in outputs {
        for tile in &output.tiles {
            image.write_tile(tile);
        }
        stats.per_worker[output.worker] = output.stats;
        stats.total += output.stats;
    }
    stats.elapsed = start.elapsed();

    log::info!(
        "Render finished in {:.2?}: {} rays, {} bounces",
        stats.elapsed,
        stats.total.rays,
        stats.total.bounces
    );

    Ok(RenderOutput { image, stats })
}

fn worker_loop(
    worker: usize,
    receiver: &Receiver<Tile>,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> WorkerOutput {
    let mut rng = stream_for_worker(config.seed, worker);
    let mut stats = WorkerStats::default();
    let mut tiles = Vec::new();

    for tile in receiver.iter() {
        tiles.push(render_tile(&tile, camera, scene, config, &mut rng, &mut stats));
    }

    log::debug!(
        "worker {} done: {} tiles, {} rays, {} bounces",
        worker,
        tiles.len(),
        stats.rays,
        stats.bounces
    );

    WorkerOutput {
        worker,
        stats,
        tiles,
    }
}
