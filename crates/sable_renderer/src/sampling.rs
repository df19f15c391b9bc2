//! Random streams and derived distributions.
//!
//! There is no global generator: every caller passes the stream it owns.
//! Workers get their own seeded `StdRng`, so a fixed seed and a fixed
//! tile-to-stream assignment reproduce an image bit for bit.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use sable_math::Vec3;

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform f32 in [min, max).
#[inline]
pub fn random_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Vector with components uniform in [0, 1).
pub fn random_vec3(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
}

/// Vector with components uniform in [min, max).
pub fn random_vec3_range(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        random_range(rng, min, max),
        random_range(rng, min, max),
        random_range(rng, min, max),
    )
}

/// Point strictly inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec3_range(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Direction on the unit sphere, the normalized in-sphere sample.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    random_in_unit_sphere(rng).normalize()
}

/// Point strictly inside the unit disk in the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(random_range(rng, -1.0, 1.0), random_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// splitmix64 finalizer, spreads nearby inputs across the seed space.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Stream owned by one worker for the whole render.
pub fn stream_for_worker(seed: u64, worker: usize) -> StdRng {
    StdRng::seed_from_u64(mix(seed ^ mix(worker as u64)))
}

/// Stream dedicated to one pixel, independent of which worker renders it.
pub fn stream_for_pixel(seed: u64, x: u32, y: u32) -> StdRng {
    let coord = ((y as u64) << 32) | x as u64;
    StdRng::seed_from_u64(mix(seed ^ mix(coord).rotate_left(17)))
}
