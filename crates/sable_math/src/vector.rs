//! Geometric helpers on top of glam's `Vec3`.
//!
//! `Vec3` doubles as point, direction and linear RGB color. None of these
//! helpers guard against zero-length input: NaN/Inf propagate to the pixel.

use crate::Vec3;

/// Linear RGB color, components nominally in [0, 1].
pub type Color = Vec3;

/// A position in world space.
pub type Point3 = Vec3;

const NEAR_ZERO_EPSILON: f32 = 1e-8;

/// True if every component is below 1e-8 in magnitude.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.x.abs() < NEAR_ZERO_EPSILON && v.y.abs() < NEAR_ZERO_EPSILON && v.z.abs() < NEAR_ZERO_EPSILON
}

/// Reflect `v` about the normal `n`: `v - 2(v·n)n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices across the boundary.
/// The result is split into the components perpendicular and parallel to
/// `n` (Snell's law).
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::splat(1e-9)));
        assert!(!near_zero(Vec3::new(0.0, 1e-7, 0.0)));
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let r = reflect(v, Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_normal_incidence_passes_straight() {
        let uv = Vec3::new(0.0, 0.0, -1.0);
        let n = Vec3::Z;
        let r = refract(uv, n, 1.0 / 1.5);
        assert!((r - uv).length() < 1e-6);
    }

    #[test]
    fn test_refract_bends_towards_normal() {
        // Entering a denser medium: the tangential component shrinks.
        let uv = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = refract(uv, Vec3::Y, 1.0 / 1.5);
        assert!(r.x.abs() < uv.x.abs());
        assert!((r.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degrees_to_radians() {
        assert!((degrees_to_radians(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((degrees_to_radians(90.0) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
