//! Batched vs scalar intersection agreement over randomized scenes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sable_renderer::{
    BatchIntersector, Hittable, IntersectBackend, Interval, LaneIntersector, Material, MaterialId,
    Ray, Scene, Sphere, SpheresSoa, Vec3, T_MIN,
};
use std::sync::Arc;

fn random_scene(rng: &mut StdRng, count: usize) -> Scene {
    let mut scene = Scene::new();
    let material = scene.add_material(Material::lambertian(Vec3::splat(0.5)));
    for _ in 0..count {
        let center = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        let radius = rng.gen_range(0.2..2.0);
        scene.add_sphere(Sphere::new(center, radius, material));
    }
    scene
}

fn random_ray(rng: &mut StdRng) -> Ray {
    let origin = Vec3::new(
        rng.gen_range(-12.0..12.0),
        rng.gen_range(-12.0..12.0),
        rng.gen_range(-12.0..12.0),
    );
    let target = Vec3::new(
        rng.gen_range(-8.0..8.0),
        rng.gen_range(-8.0..8.0),
        rng.gen_range(-8.0..8.0),
    );
    Ray::new(origin, target - origin)
}

#[test]
fn lanes_match_scalar_scan_for_random_rays() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let scene = random_scene(&mut rng, 50);
    let soa = SpheresSoa::from_spheres(scene.spheres());
    let window = Interval::new(T_MIN, f32::INFINITY);

    let mut hits = 0;
    for _ in 0..1000 {
        let ray = random_ray(&mut rng);
        let scalar = scene.hit_linear(&ray, window);
        let batched = scene.hit_batched(&LaneIntersector, &soa, &ray, window);

        match (scalar, batched) {
            (None, None) => {}
            (Some(a), Some(b)) => {
                hits += 1;
                assert!((a.t - b.t).abs() <= 1e-5 * a.t.max(1.0), "t {} vs {}", a.t, b.t);
                assert_eq!(a.material, b.material);
                assert!((a.p - b.p).length() < 1e-3);
            }
            (a, b) => panic!("hit decision differs for {ray:?}: {a:?} vs {b:?}"),
        }
    }

    // Most rays are aimed into the cloud of spheres.
    assert!(hits > 100, "only {hits} hits");
}

#[test]
fn lanes_match_scalar_scan_with_tight_windows() {
    let mut rng = StdRng::seed_from_u64(17);
    let scene = random_scene(&mut rng, 50);
    let soa = SpheresSoa::from_spheres(scene.spheres());

    for _ in 0..1000 {
        let ray = random_ray(&mut rng);
        let t_max = rng.gen_range(0.1..1.5);
        let window = Interval::new(T_MIN, t_max);

        let scalar = scene.hit_linear(&ray, window).map(|rec| rec.t);
        let batched = LaneIntersector.nearest(&soa, &ray, window).map(|(_, t)| t);
        assert_eq!(scalar.is_some(), batched.is_some());
        if let (Some(a), Some(b)) = (scalar, batched) {
            assert!(a <= t_max && b <= t_max);
            assert!((a - b).abs() <= 1e-5 * a.max(1.0));
        }
    }
}

#[test]
fn batched_backend_is_used_through_scene_hit() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut scene = random_scene(&mut rng, 23);
    scene.prepare_soa();
    scene.set_backend(IntersectBackend::Batched(Arc::new(LaneIntersector)));
    assert!(scene.validate().is_ok());

    let window = Interval::new(T_MIN, f32::INFINITY);
    for _ in 0..200 {
        let ray = random_ray(&mut rng);
        let via_backend = scene.hit(&ray, window).map(|rec| rec.t);
        let scalar = scene.hit_linear(&ray, window).map(|rec| rec.t);
        assert_eq!(via_backend.is_some(), scalar.is_some());
    }
}

#[test]
fn padding_lanes_never_win_through_origin() {
    // Three spheres, five padding lanes; every ray passes through (0, 0, 0).
    let spheres = [
        Sphere::new(Vec3::new(0.0, 0.0, -50.0), 1.0, MaterialId(0)),
        Sphere::new(Vec3::new(50.0, 0.0, 0.0), 1.0, MaterialId(1)),
        Sphere::new(Vec3::new(0.0, 50.0, 0.0), 1.0, MaterialId(2)),
    ];
    let soa = SpheresSoa::from_spheres(&spheres);
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..500 {
        let dir = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let ray = Ray::new(-dir * 3.0, dir);
        if let Some((index, t)) = LaneIntersector.nearest(&soa, &ray, Interval::UNIVERSE) {
            assert!(index < spheres.len());
            assert!(t.is_finite());
        }
    }
}
