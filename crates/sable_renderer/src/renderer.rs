//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a hard depth cap
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::sampling::gen_f32;
use crate::{Camera, Color, Hittable, RenderConfig, Scene};
use sable_math::{Interval, Ray};
use rand::RngCore;
use std::ops::AddAssign;

/// Lower bound of the hit window; keeps scattered rays off their own surface.
pub const T_MIN: f32 = 0.001;

/// Per-worker counters, private to one worker until the post-join merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Camera rays traced
    pub rays: u64,
    /// Successful scatter events
    pub bounces: u64,
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.rays += other.rays;
        self.bounces += other.bounces;
    }
}

/// Compute the color seen by a ray.
///
/// Alternates scene intersection and material scattering. Terminates with
/// black once `depth` reaches zero or a material absorbs; rays that escape
/// pick up the sky gradient.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    rng: &mut dyn RngCore,
    stats: &mut WorkerStats,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.hit(ray, Interval::new(T_MIN, f32::INFINITY)) else {
        return sky_color(ray);
    };

    match scene.material(rec.material).scatter(ray, &rec, rng) {
        Some(result) => {
            stats.bounces += 1;
            result.attenuation * ray_color(&result.scattered, scene, depth - 1, rng, stats)
        }
        None => Color::ZERO,
    }
}

/// Background gradient from white at the horizon to sky blue at the zenith.
pub fn sky_color(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` has `y = 0` on the bottom scanline. Returns the averaged,
/// gamma-corrected color.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
    stats: &mut WorkerStats,
) -> Color {
    let span_x = config.width.saturating_sub(1).max(1) as f32;
    let span_y = config.height.saturating_sub(1).max(1) as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / span_x;
        let t = (y as f32 + gen_f32(rng)) / span_y;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, rng, stats);
        stats.rays += 1;
    }

    let scale = 1.0 / config.samples_per_pixel as f32;
    Color::new(
        linear_to_gamma(scale * pixel_color.x),
        linear_to_gamma(scale * pixel_color.y),
        linear_to_gamma(scale * pixel_color.z),
    )
}
