//! External batched intersection routine.
//!
//! Manual FFI binding to a C ABI `spheres_hit` (typically compiled from an
//! ISPC kernel), linked by `build.rs` when the `ispc` feature is on. It takes
//! the SoA arrays including padding, so the kernel can run full-width gangs;
//! padding lanes hold NaN and must fail its discriminant test.

use crate::soa::{BatchIntersector, SpheresSoa};
use bytemuck::{Pod, Zeroable};
use sable_math::{Interval, Ray, Vec3};

// Matches `struct float3 { float v[3]; } __attribute__((aligned(16)))`
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Float3 {
    v: [f32; 3],
    _pad: f32,
}

impl From<Vec3> for Float3 {
    fn from(v: Vec3) -> Self {
        Self {
            v: v.to_array(),
            _pad: 0.0,
        }
    }
}

// Matches `struct Ray { struct float3 origin; struct float3 dir; }`
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FfiRay {
    origin: Float3,
    dir: Float3,
}

extern "C" {
    fn spheres_hit(
        center_x: *const f32,
        center_y: *const f32,
        center_z: *const f32,
        radius: *const f32,
        spheres_count: i32,
        ray: *const FfiRay,
        t_min: f32,
        t_max: f32,
        out_t: *mut f32,
        out_hit_index: *mut i32,
    ) -> bool;
}

/// Batched backend that delegates to the linked `spheres_hit` routine.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForeignIntersector;

impl BatchIntersector for ForeignIntersector {
    fn nearest(&self, soa: &SpheresSoa, ray: &Ray, ray_t: Interval) -> Option<(usize, f32)> {
        let count = i32::try_from(soa.padded_len()).ok()?;
        if count == 0 {
            return None;
        }

        let ffi_ray = FfiRay {
            origin: ray.origin.into(),
            dir: ray.direction.into(),
        };
        let mut out_t = 0.0f32;
        let mut out_index = -1i32;

        // SAFETY: all four arrays hold `padded_len` elements and outlive the
        // call; the out-pointers refer to live locals.
        let hit = unsafe {
            spheres_hit(
                soa.center_x().as_ptr(),
                soa.center_y().as_ptr(),
                soa.center_z().as_ptr(),
                soa.radius().as_ptr(),
                count,
                &ffi_ray,
                ray_t.min,
                ray_t.max,
                &mut out_t,
                &mut out_index,
            )
        };

        let index = usize::try_from(out_index).ok()?;
        if hit && index < soa.len() {
            Some((index, out_t))
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "spheres_hit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_layout_matches_c() {
        assert_eq!(std::mem::size_of::<Float3>(), 16);
        assert_eq!(std::mem::align_of::<Float3>(), 16);
        assert_eq!(std::mem::size_of::<FfiRay>(), 32);

        let ray: FfiRay = Zeroable::zeroed();
        assert_eq!(bytemuck::bytes_of(&ray), &[0u8; 32]);
    }
}
