//! Built-in scenarios.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sable_renderer::sampling::{gen_f32, random_range, random_vec3, random_vec3_range};
use sable_renderer::{CameraSettings, Color, Material, Point3, Scene, Sphere, Vec3};

/// Ground, a diffuse center sphere, a hollow glass sphere on the left and a
/// fuzzy metal sphere on the right, seen from the origin down -Z.
pub fn three_spheres() -> (Scene, CameraSettings) {
    let mut scene = Scene::new();

    let ground = scene.add_material(Material::lambertian(Color::new(0.8, 0.8, 0.0)));
    let center = scene.add_material(Material::lambertian(Color::new(0.1, 0.2, 0.5)));
    let left = scene.add_material(Material::dielectric(1.5));
    let right = scene.add_material(Material::metal(Color::new(0.8, 0.6, 0.2), 1.0));

    scene.add_sphere(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground));
    scene.add_sphere(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, center));
    scene.add_sphere(Sphere::new(Point3::new(-1.0, 0.0, -1.0), -0.4, left));
    scene.add_sphere(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, right));

    (scene, CameraSettings::default())
}

/// The book-cover field: a 22x22 grid of small random spheres around three
/// large feature spheres.
pub fn random_cover(seed: u64) -> (Scene, CameraSettings) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new();

    let ground = scene.add_material(Material::lambertian(Color::splat(0.5)));
    scene.add_sphere(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    let keep_clear = Point3::new(4.0, 0.2, 0.0);
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(&mut rng);
            let center = Point3::new(
                a as f32 + 0.9 * gen_f32(&mut rng),
                0.2,
                b as f32 + 0.9 * gen_f32(&mut rng),
            );

            if (center - keep_clear).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                let albedo = random_vec3(&mut rng) * random_vec3(&mut rng);
                Material::lambertian(albedo)
            } else if choose_mat < 0.95 {
                let albedo = random_vec3_range(&mut rng, 0.5, 1.0);
                let fuzz = random_range(&mut rng, 0.0, 0.5);
                Material::metal(albedo, fuzz)
            } else {
                Material::dielectric(1.5)
            };

            let id = scene.add_material(material);
            scene.add_sphere(Sphere::new(center, 0.2, id));
        }
    }

    let glass = scene.add_material(Material::dielectric(1.5));
    scene.add_sphere(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, glass));

    let diffuse = scene.add_material(Material::lambertian(Color::new(0.4, 0.2, 0.1)));
    scene.add_sphere(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, diffuse));

    let mirror = scene.add_material(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add_sphere(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, mirror));

    let camera = CameraSettings::default()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0);

    (scene, camera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_spheres_is_valid() {
        let (scene, camera) = three_spheres();
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.materials().len(), 4);
        assert!(scene.validate().is_ok());
        assert!(camera.validate().is_ok());
    }

    #[test]
    fn test_random_cover_is_seeded() {
        let (a, camera) = random_cover(7);
        let (b, _) = random_cover(7);
        assert_eq!(a.spheres(), b.spheres());
        assert!(a.validate().is_ok());
        assert!(camera.validate().is_ok());

        // ground + at most 484 small spheres + 3 feature spheres
        assert!(a.len() > 400 && a.len() <= 1 + 22 * 22 + 3);
        assert!(a.spheres()[1..a.len() - 3]
            .iter()
            .all(|s| s.radius == 0.2 && (s.center - Point3::new(4.0, 0.2, 0.0)).length() > 0.9));
    }
}
