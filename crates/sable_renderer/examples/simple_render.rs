//! Simple path tracer example.
//!
//! Renders a small glass/diffuse/metal scene with the tile scheduler and
//! saves it as PPM.

use sable_renderer::{
    quantize, render, Camera, CameraSettings, Color, Material, RenderConfig, RowOrder, Scene,
    Sphere, Vec3,
};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = build_scene();

    let config = RenderConfig::default()
        .with_resolution(400, 225)
        .with_quality(32, 10);

    let settings = CameraSettings::default()
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect_ratio(config.aspect_ratio());
    let camera = Camera::try_new(&settings)?;

    let output = render(&scene, &camera, &config)?;
    println!(
        "Rendered in {:?} ({:.2} MRays/s)",
        output.stats.elapsed,
        output.stats.rays_per_second() / 1e6
    );

    let filename = "output.ppm";
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "P3\n{} {}\n255", config.width, config.height)?;
    for row in output.image.rows(RowOrder::TopDown) {
        for color in row {
            let [r, g, b] = quantize(*color);
            writeln!(file, "{} {} {}", r, g, b)?;
        }
    }
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    // Ground
    let ground = scene.add_material(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    // Three main spheres
    let glass = scene.add_material(Material::dielectric(1.5));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));

    let diffuse = scene.add_material(Material::lambertian(Color::new(0.4, 0.2, 0.1)));
    scene.add_sphere(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, diffuse));

    let metal = scene.add_material(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add_sphere(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, metal));

    scene
}
