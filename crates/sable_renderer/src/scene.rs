//! Scene: spheres, their material palette, and the intersection backend.
//!
//! A scene is built single-threaded, then shared read-only by every render
//! worker. Nothing in here is mutated during a render.

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Material, MaterialId};
use crate::soa::{BatchIntersector, SpheresSoa};
use crate::sphere::Sphere;
use sable_math::{Interval, Ray};
use std::sync::Arc;
use thiserror::Error;

/// Scene construction errors, reported by [`Scene::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("sphere {index} has zero radius")]
    ZeroRadius { index: usize },

    #[error("sphere {index} has a non-finite center or radius")]
    NonFiniteSphere { index: usize },

    #[error("sphere {sphere} references material {material}, palette has {palette_len}")]
    MaterialOutOfRange {
        sphere: usize,
        material: usize,
        palette_len: usize,
    },

    #[error("material {index} is invalid: {reason}")]
    InvalidMaterial { index: usize, reason: &'static str },

    #[error("batched backend selected but the SoA cache is stale; call prepare_soa()")]
    StaleSoa,
}

/// How [`Scene::hit`] searches the sphere list.
#[derive(Debug, Clone, Default)]
pub enum IntersectBackend {
    /// Scalar scan with a shrinking window.
    #[default]
    Linear,
    /// Batched search over the SoA cache.
    Batched(Arc<dyn BatchIntersector>),
}

/// Owning collection of spheres plus a parallel material palette.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    materials: Vec<Material>,
    soa: Option<SpheresSoa>,
    /// Set by any sphere mutation after the SoA cache was built.
    soa_dirty: bool,
    backend: IntersectBackend,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a material to the palette and return its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Add a sphere. Invalidates the SoA cache.
    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
        self.soa_dirty = true;
    }

    /// Remove all spheres; the material palette is kept.
    pub fn clear(&mut self) {
        self.spheres.clear();
        self.soa_dirty = true;
    }

    /// Get the number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene has no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Look up a palette entry.
    ///
    /// Panics if `id` is out of range: that is a broken scene invariant,
    /// not a recoverable condition. [`Scene::validate`] catches it up front.
    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    /// Rebuild the SoA cache from the current sphere list.
    pub fn prepare_soa(&mut self) {
        let soa = SpheresSoa::from_spheres(&self.spheres);
        log::debug!(
            "Built SoA cache: {} spheres in {} padded slots",
            soa.len(),
            soa.padded_len()
        );
        self.soa = Some(soa);
        self.soa_dirty = false;
    }

    /// The SoA cache, if built and still in sync with the sphere list.
    pub fn soa(&self) -> Option<&SpheresSoa> {
        if self.soa_dirty {
            None
        } else {
            self.soa.as_ref()
        }
    }

    /// Select the intersection backend used by [`Hittable::hit`].
    pub fn set_backend(&mut self, backend: IntersectBackend) {
        if let IntersectBackend::Batched(intersector) = &backend {
            if self.soa().is_none() {
                log::warn!(
                    "Batched backend '{}' selected without a current SoA cache; \
                     falling back to the linear scan until prepare_soa()",
                    intersector.name()
                );
            }
        }
        self.backend = backend;
    }

    pub fn backend(&self) -> &IntersectBackend {
        &self.backend
    }

    /// Check every construction invariant the hot path relies on.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !(sphere.center.is_finite() && sphere.radius.is_finite()) {
                return Err(SceneError::NonFiniteSphere { index });
            }
            if sphere.radius == 0.0 {
                return Err(SceneError::ZeroRadius { index });
            }
            if sphere.material.0 >= self.materials.len() {
                return Err(SceneError::MaterialOutOfRange {
                    sphere: index,
                    material: sphere.material.0,
                    palette_len: self.materials.len(),
                });
            }
        }

        for (index, material) in self.materials.iter().enumerate() {
            validate_material(material)
                .map_err(|reason| SceneError::InvalidMaterial { index, reason })?;
        }

        if matches!(self.backend, IntersectBackend::Batched(_)) && self.soa().is_none() {
            return Err(SceneError::StaleSoa);
        }

        Ok(())
    }

    /// Scalar nearest-hit scan.
    ///
    /// The window shrinks to the closest hit so far; a later sphere must be
    /// strictly closer to replace it, so ties go to scan order.
    pub fn hit_linear(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for sphere in &self.spheres {
            let window = ray_t.with_max(closest.map_or(ray_t.max, |rec| rec.t));
            if let Some(rec) = sphere.hit(ray, window) {
                if closest.map_or(true, |best| rec.t < best.t) {
                    closest = Some(rec);
                }
            }
        }

        closest
    }

    /// Nearest-hit search through a batched backend over `soa`.
    pub fn hit_batched(
        &self,
        intersector: &dyn BatchIntersector,
        soa: &SpheresSoa,
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<HitRecord> {
        intersector
            .nearest(soa, ray, ray_t)
            .map(|(index, t)| self.spheres[index].record_at(ray, t))
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match (&self.backend, self.soa()) {
            (IntersectBackend::Batched(intersector), Some(soa)) => {
                self.hit_batched(intersector.as_ref(), soa, ray, ray_t)
            }
            // A stale cache falls back to the scalar scan.
            _ => self.hit_linear(ray, ray_t),
        }
    }
}

fn validate_material(material: &Material) -> Result<(), &'static str> {
    let albedo_ok = |albedo: sable_math::Color| {
        albedo.is_finite() && albedo.min_element() >= 0.0 && albedo.max_element() <= 1.0
    };

    match *material {
        Material::Lambertian { albedo } if !albedo_ok(albedo) => {
            Err("albedo components must lie in [0, 1]")
        }
        Material::Metal { albedo, .. } if !albedo_ok(albedo) => {
            Err("albedo components must lie in [0, 1]")
        }
        Material::Metal { fuzz, .. } if !(0.0..=1.0).contains(&fuzz) => {
            Err("fuzz must lie in [0, 1]")
        }
        Material::Dielectric { ior } if !(ior.is_finite() && ior > 0.0) => {
            Err("index of refraction must be finite and > 0")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soa::LaneIntersector;
    use sable_math::{Color, Vec3};

    fn two_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let near_mat = scene.add_material(Material::lambertian(Color::splat(0.5)));
        let far_mat = scene.add_material(Material::metal(Color::splat(0.9), 0.1));
        // Listed far first so scan order differs from distance order.
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, far_mat));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, near_mat));
        scene
    }

    #[test]
    fn test_nearest_hit_wins() {
        let scene = two_sphere_scene();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let rec = scene.hit(&ray, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!((rec.t - 3.0).abs() < 1e-5);
        assert_eq!(rec.material, MaterialId(0));
    }

    #[test]
    fn test_tighter_window_returns_farther_hit() {
        let scene = two_sphere_scene();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        // Start past both roots of the near sphere.
        let rec = scene.hit(&ray, Interval::new(5.5, f32::INFINITY)).expect("hit");
        assert!((rec.t - 9.0).abs() < 1e-5);
        assert_eq!(rec.material, MaterialId(1));

        assert!(scene.hit(&ray, Interval::new(0.001, 2.0)).is_none());
    }

    #[test]
    fn test_ties_keep_first_in_scan_order() {
        let mut scene = Scene::new();
        let a = scene.add_material(Material::lambertian(Color::splat(0.1)));
        let b = scene.add_material(Material::lambertian(Color::splat(0.2)));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, a));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, b));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = scene.hit(&ray, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert_eq!(rec.material, a);
    }

    #[test]
    fn test_batched_backend_matches_linear() {
        let mut scene = two_sphere_scene();
        scene.prepare_soa();
        scene.set_backend(IntersectBackend::Batched(Arc::new(LaneIntersector)));
        assert!(scene.validate().is_ok());

        let ray = Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let window = Interval::new(0.001, f32::INFINITY);
        assert_eq!(scene.hit(&ray, window), scene.hit_linear(&ray, window));
    }

    #[test]
    fn test_mutation_marks_soa_stale() {
        let mut scene = two_sphere_scene();
        scene.set_backend(IntersectBackend::Batched(Arc::new(LaneIntersector)));
        assert_eq!(scene.validate(), Err(SceneError::StaleSoa));

        scene.prepare_soa();
        assert!(scene.soa().is_some());
        assert!(scene.validate().is_ok());

        let id = MaterialId(0);
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, id));
        assert!(scene.soa().is_none());
        assert_eq!(scene.validate(), Err(SceneError::StaleSoa));

        // The stale cache is bypassed: the new sphere is still found.
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = scene.hit(&ray, Interval::new(0.001, f32::INFINITY)).expect("hit");
        assert!((rec.t - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_validate_rejects_bad_spheres() {
        let mut scene = Scene::new();
        let id = scene.add_material(Material::dielectric(1.5));
        scene.add_sphere(Sphere::new(Vec3::ZERO, 0.0, id));
        assert_eq!(scene.validate(), Err(SceneError::ZeroRadius { index: 0 }));

        scene.clear();
        scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, MaterialId(3)));
        assert_eq!(
            scene.validate(),
            Err(SceneError::MaterialOutOfRange { sphere: 0, material: 3, palette_len: 1 })
        );

        scene.clear();
        scene.add_sphere(Sphere::new(Vec3::new(f32::NAN, 0.0, 0.0), 1.0, id));
        assert_eq!(scene.validate(), Err(SceneError::NonFiniteSphere { index: 0 }));
    }

    #[test]
    fn test_validate_rejects_bad_materials() {
        let mut scene = Scene::new();
        scene.add_material(Material::Metal { albedo: Color::ONE, fuzz: 2.0 });
        assert!(matches!(scene.validate(), Err(SceneError::InvalidMaterial { index: 0, .. })));

        let mut scene = Scene::new();
        scene.add_material(Material::lambertian(Color::new(1.5, 0.0, 0.0)));
        assert!(matches!(scene.validate(), Err(SceneError::InvalidMaterial { index: 0, .. })));

        let mut scene = Scene::new();
        scene.add_material(Material::dielectric(0.0));
        assert!(matches!(scene.validate(), Err(SceneError::InvalidMaterial { index: 0, .. })));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_material_is_fatal() {
        let scene = Scene::new();
        let _ = scene.material(MaterialId(0));
    }
}
