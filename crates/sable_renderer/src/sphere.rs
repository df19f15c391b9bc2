//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::material::MaterialId;
use sable_math::{Interval, Point3, Ray};

/// A sphere primitive.
///
/// The radius is signed: a negative radius flips the outward normal, which
/// models the inner wall of a hollow shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f32,
    pub material: MaterialId,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Point3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Complete a hit record for a root `t` already known to be accepted.
    #[inline]
    pub fn record_at(&self, ray: &Ray, t: f32) -> HitRecord {
        let p = ray.at(t);
        let outward_normal = (p - self.center) / self.radius;
        HitRecord::with_face_normal(ray, t, p, outward_normal, self.material)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let half_b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // The nearer root may sit behind the origin or past the closest hit.
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        Some(self.record_at(ray, root))
    }
}
