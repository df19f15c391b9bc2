//! Hittable trait and HitRecord for ray-object intersection.

use crate::material::MaterialId;
use sable_math::{Interval, Point3, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Produced by an intersection test and consumed immediately by the
/// integrator. The material is referenced by palette index; the scene owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Index into the scene's material palette
    pub material: MaterialId,
}

impl HitRecord {
    /// Build a record whose normal opposes the incoming ray.
    ///
    /// `outward_normal` is flipped when the ray travels along it
    /// (`dir · n >= 0`), i.e. when the ray hits the back face.
    pub fn with_face_normal(
        ray: &Ray,
        t: f32,
        p: Point3,
        outward_normal: Vec3,
        material: MaterialId,
    ) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p,
            normal,
            t,
            front_face,
            material,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` inside the closed window `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;
}
