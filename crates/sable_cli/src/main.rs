//! `sable` - render a built-in sphere scene to PPM or PNG.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sable_renderer::{
    render, Camera, IntersectBackend, LaneIntersector, RenderConfig, RenderStats, Scene,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

mod cli;
mod logger;
mod output;
mod scenes;

use cli::{Args, BackendChoice, SceneChoice};
use logger::init_logger;

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        return Ok(RenderConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn select_backend(scene: &mut Scene, choice: BackendChoice) -> Result<()> {
    let backend = match choice {
        BackendChoice::Linear => return Ok(()),
        BackendChoice::Lanes => IntersectBackend::Batched(Arc::new(LaneIntersector)),
        #[cfg(feature = "ispc")]
        BackendChoice::Foreign => {
            IntersectBackend::Batched(Arc::new(sable_renderer::ForeignIntersector))
        }
        #[cfg(not(feature = "ispc"))]
        BackendChoice::Foreign => {
            anyhow::bail!("the foreign backend needs a build with `--features ispc`")
        }
    };

    scene.prepare_soa();
    scene.set_backend(backend);
    Ok(())
}

fn log_summary(stats: &RenderStats) {
    let total = stats.total;
    info!(
        "Rendered {} tiles in {:.2?}: {:.2} MRays, {} bounces, {:.2} MRays/s",
        stats.tiles,
        stats.elapsed,
        total.rays as f64 / 1e6,
        total.bounces,
        stats.rays_per_second() / 1e6
    );
    for (worker, worker_stats) in stats.per_worker.iter().enumerate() {
        log::debug!(
            "  worker {}: {} rays, {} bounces",
            worker,
            worker_stats.rays,
            worker_stats.bounces
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    info!("Sable {}", env!("CARGO_PKG_VERSION"));

    let config = args.apply_overrides(load_config(args.config.as_deref())?);

    let (mut scene, camera_settings) = match args.scene {
        SceneChoice::ThreeSpheres => scenes::three_spheres(),
        SceneChoice::Cover => scenes::random_cover(config.seed),
    };
    select_backend(&mut scene, args.backend)?;
    info!(
        "Scene {:?}: {} spheres, {} materials",
        args.scene,
        scene.len(),
        scene.materials().len()
    );

    let camera = Camera::try_new(&camera_settings.with_aspect_ratio(config.aspect_ratio()))
        .context("invalid camera")?;

    let result = render(&scene, &camera, &config).context("render failed")?;
    log_summary(&result.stats);

    match &args.output {
        Some(path) => output::save(&result.image, path)?,
        None => output::write_stdout(&result.image)?,
    }

    Ok(())
}
