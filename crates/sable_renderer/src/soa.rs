//! Structure-of-arrays sphere layout and batched nearest-hit search.
//!
//! Each sphere field lives in its own contiguous array, padded up to a
//! multiple of [`LANES`] so batched code never special-cases the tail.
//! Padding entries carry NaN centers and radii; every acceptance test below
//! is written in positive form (`x >= 0`, `min <= t <= max`), and NaN fails
//! all of them, so a padding lane can never win for any ray. A zero radius
//! at the origin would not be safe: a ray through the origin has a zero
//! discriminant there and a perfectly valid root.

use crate::sphere::Sphere;
use crate::material::MaterialId;
use sable_math::{Interval, Ray};
use std::fmt;

/// Batch width of the SoA layout.
pub const LANES: usize = 8;

/// Material index stored in padding lanes.
const PADDING_MATERIAL: usize = usize::MAX;

/// Parallel arrays of sphere data, derived from a scene's sphere list.
#[derive(Debug, Clone, PartialEq)]
pub struct SpheresSoa {
    center_x: Vec<f32>,
    center_y: Vec<f32>,
    center_z: Vec<f32>,
    radius: Vec<f32>,
    material: Vec<usize>,
    len: usize,
}

/// Round `num` up to the next multiple of `factor`.
fn round_up(num: usize, factor: usize) -> usize {
    num.div_ceil(factor) * factor
}

impl SpheresSoa {
    pub fn from_spheres(spheres: &[Sphere]) -> Self {
        let padded = round_up(spheres.len(), LANES);

        let mut soa = Self {
            center_x: vec![f32::NAN; padded],
            center_y: vec![f32::NAN; padded],
            center_z: vec![f32::NAN; padded],
            radius: vec![f32::NAN; padded],
            material: vec![PADDING_MATERIAL; padded],
            len: spheres.len(),
        };

        for (i, sphere) in spheres.iter().enumerate() {
            soa.center_x[i] = sphere.center.x;
            soa.center_y[i] = sphere.center.y;
            soa.center_z[i] = sphere.center.z;
            soa.radius[i] = sphere.radius;
            soa.material[i] = sphere.material.0;
        }

        soa
    }

    /// Number of real spheres.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Array length including padding; always a multiple of [`LANES`].
    pub fn padded_len(&self) -> usize {
        self.radius.len()
    }

    /// Material of the `index`-th real sphere.
    pub fn material(&self, index: usize) -> MaterialId {
        debug_assert!(index < self.len);
        MaterialId(self.material[index])
    }

    pub fn center_x(&self) -> &[f32] {
        &self.center_x
    }

    pub fn center_y(&self) -> &[f32] {
        &self.center_y
    }

    pub fn center_z(&self) -> &[f32] {
        &self.center_z
    }

    pub fn radius(&self) -> &[f32] {
        &self.radius
    }
}

/// A strategy that finds the nearest sphere hit over a [`SpheresSoa`].
///
/// Returns the winning sphere index and its `t`. Implementations must agree
/// with the scalar scan: same hit decision, same `t`, ties to the lowest index.
pub trait BatchIntersector: Send + Sync {
    fn nearest(&self, soa: &SpheresSoa, ray: &Ray, ray_t: Interval) -> Option<(usize, f32)>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn BatchIntersector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pure Rust batched backend: evaluates [`LANES`] spheres per step.
#[derive(Debug, Default, Clone, Copy)]
pub struct LaneIntersector;

impl BatchIntersector for LaneIntersector {
    fn nearest(&self, soa: &SpheresSoa, ray: &Ray, ray_t: Interval) -> Option<(usize, f32)> {
        let (ox, oy, oz) = (ray.origin.x, ray.origin.y, ray.origin.z);
        let (dx, dy, dz) = (ray.direction.x, ray.direction.y, ray.direction.z);
        let a = dx * dx + dy * dy + dz * dz;

        let mut best: Option<(usize, f32)> = None;

        let chunks = soa
            .center_x
            .chunks_exact(LANES)
            .zip(soa.center_y.chunks_exact(LANES))
            .zip(soa.center_z.chunks_exact(LANES))
            .zip(soa.radius.chunks_exact(LANES));

        for (chunk, (((cx, cy), cz), r)) in chunks.enumerate() {
            // Window is fixed for the whole chunk; the reduction below
            // re-checks against the running best in index order.
            let t_max = best.map_or(ray_t.max, |(_, t)| t);
            let mut roots = [f32::NAN; LANES];

            for lane in 0..LANES {
                let ocx = ox - cx[lane];
                let ocy = oy - cy[lane];
                let ocz = oz - cz[lane];
                let half_b = ocx * dx + ocy * dy + ocz * dz;
                let c = (ocx * ocx + ocy * ocy + ocz * ocz) - r[lane] * r[lane];
                let discriminant = half_b * half_b - a * c;

                if discriminant >= 0.0 {
                    let sqrtd = discriminant.sqrt();
                    let near = (-half_b - sqrtd) / a;
                    let far = (-half_b + sqrtd) / a;
                    roots[lane] = if ray_t.min <= near && near <= t_max {
                        near
                    } else {
                        far
                    };
                }
            }

            for (lane, &t) in roots.iter().enumerate() {
                let accepted = match best {
                    None => ray_t.min <= t && t <= ray_t.max,
                    Some((_, best_t)) => ray_t.min <= t && t < best_t,
                };
                if accepted {
                    best = Some((chunk * LANES + lane, t));
                }
            }
        }

        best
    }

    fn name(&self) -> &'static str {
        "lanes"
    }
}
