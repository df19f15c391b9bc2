//! Sable - CPU path tracing for sphere scenes
//!
//! A Monte Carlo path tracer built around a flat sphere list, a closed
//! Lambertian/Metal/Dielectric material set, and a tile scheduler that
//! spreads work across a fixed worker pool.
//!
//! Intersection runs either as a scalar scan or batched over a
//! structure-of-arrays cache; with the `ispc` feature the batched search can
//! be delegated to an externally compiled `spheres_hit` routine.

mod camera;
mod config;
mod hittable;
mod image;
mod material;
mod renderer;
mod scene;
mod scheduler;
mod soa;
mod sphere;
mod tile;

pub mod sampling;

#[cfg(feature = "ispc")]
mod foreign;

pub use camera::{Camera, CameraError, CameraSettings};
pub use config::{RenderConfig, SeedingPolicy};
pub use hittable::{HitRecord, Hittable};
pub use image::{quantize, ImageBuffer, RowOrder};
pub use material::{reflectance, Material, MaterialId, ScatterResult};
pub use renderer::{linear_to_gamma, ray_color, render_pixel, sky_color, WorkerStats, T_MIN};
pub use scene::{IntersectBackend, Scene, SceneError};
pub use scheduler::{render, RenderError, RenderOutput, RenderStats};
pub use soa::{BatchIntersector, LaneIntersector, SpheresSoa, LANES};
pub use sphere::Sphere;
pub use tile::{generate_tiles, render_tile, Tile, TileOrder, TileResult};

#[cfg(feature = "ispc")]
pub use foreign::ForeignIntersector;

/// Re-export Vec3 and common math types from sable_math
pub use sable_math::{Color, Interval, Point3, Ray, Vec3};
