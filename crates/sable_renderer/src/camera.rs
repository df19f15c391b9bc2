//! Thin-lens camera for ray generation.

use crate::sampling::random_in_unit_disk;
use sable_math::{degrees_to_radians, Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a camera description cannot produce a usable view.
#[derive(Debug, Error, PartialEq)]
pub enum CameraError {
    #[error("aspect ratio must be finite and > 0, got {0}")]
    InvalidAspectRatio(f32),

    #[error("focus distance must be finite and > 0, got {0}")]
    InvalidFocusDistance(f32),

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("view direction is parallel to the up vector (or zero length)")]
    DegenerateOrientation,
}

/// User-facing camera description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Point3,
    pub look_at: Point3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub aspect_ratio: f32,
    /// Lens diameter; 0 disables depth of field
    pub aperture: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraSettings {
    /// Axis-aligned view from the origin down -Z, 16:9, pinhole.
    fn default() -> Self {
        Self {
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Reject inputs that would turn every pixel into NaN/Inf.
    pub fn validate(&self) -> Result<(), CameraError> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(CameraError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(CameraError::InvalidFocusDistance(self.focus_dist));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(CameraError::InvalidFieldOfView(self.vfov));
        }
        let forward = self.look_from - self.look_at;
        if forward.length_squared() == 0.0 || self.vup.cross(forward).length_squared() == 0.0 {
            return Err(CameraError::DegenerateOrientation);
        }
        Ok(())
    }
}

/// Camera for generating rays into the scene.
///
/// Immutable once built; maps normalized image-plane coordinates `(s, t)`,
/// with `(0, 0)` the lower-left corner, to world-space rays.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Derive the orthonormal basis and viewport from `settings`.
    ///
    /// Does not validate; see [`CameraSettings::validate`].
    pub fn new(settings: &CameraSettings) -> Self {
        let theta = degrees_to_radians(settings.vfov);
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = settings.aspect_ratio * viewport_height;

        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = settings.look_from;
        let horizontal = settings.focus_dist * viewport_width * u;
        let vertical = settings.focus_dist * viewport_height * v;
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - settings.focus_dist * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: settings.aperture / 2.0,
        }
    }

    /// Validate `settings`, then build.
    pub fn try_new(settings: &CameraSettings) -> Result<Self, CameraError> {
        settings.validate()?;
        Ok(Self::new(settings))
    }

    /// Generate a ray through image-plane point `(s, t)`, jittered across the lens.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
        )
    }

    /// Orthonormal basis `(u, v, w)`; `w` points away from the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_basis() {
        let camera = Camera::default();
        let (u, v, w) = camera.basis();

        assert!((u - Vec3::X).length() < 1e-6);
        assert!((v - Vec3::Y).length() < 1e-6);
        assert!((w - Vec3::Z).length() < 1e-6);
        assert_eq!(camera.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::default();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction.normalize() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_corner_rays_span_viewport() {
        // vfov 90 => viewport height 2 at focus distance 1
        let camera = Camera::new(&CameraSettings::default().with_aspect_ratio(1.0));
        let mut rng = StdRng::seed_from_u64(1);

        let lower_left = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((lower_left.direction - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);

        let upper_right = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((upper_right.direction - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_aperture_jitters_origin_within_lens() {
        let settings = CameraSettings::default().with_lens(40.0, 0.5, 2.0);
        let camera = Camera::new(&settings);
        let mut rng = StdRng::seed_from_u64(3);

        let mut moved = false;
        for _ in 0..64 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert!(ray.origin.length() < camera.lens_radius() + 1e-6);
            // Every ray through the same image point converges on the focus plane.
            let focus_point = ray.at(1.0);
            assert!((focus_point - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-4);
            moved |= ray.origin != Vec3::ZERO;
        }
        assert!(moved);
    }

    #[test]
    fn test_validate() {
        assert!(CameraSettings::default().validate().is_ok());
        assert_eq!(
            CameraSettings::default().with_aspect_ratio(0.0).validate(),
            Err(CameraError::InvalidAspectRatio(0.0))
        );
        assert_eq!(
            CameraSettings::default().with_lens(90.0, 0.0, 0.0).validate(),
            Err(CameraError::InvalidFocusDistance(0.0))
        );
        assert_eq!(
            CameraSettings::default().with_lens(180.0, 0.0, 1.0).validate(),
            Err(CameraError::InvalidFieldOfView(180.0))
        );
        let looking_up = CameraSettings::default().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert_eq!(looking_up.validate(), Err(CameraError::DegenerateOrientation));
    }
}
