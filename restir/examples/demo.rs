//! Renders a couple of cubes orbiting over a floor, lit by a hemisphere of
//! area lights, and saves the last frame as `demo.png`.
//!
//! Run with `RUST_LOG=restir=debug` to see what the pipeline is up to.

use std::error::Error;
use std::f32::consts::TAU;

use glam::{uvec2, vec2, vec3, Affine3A, Quat, Vec3};
use restir::{
    Camera, CameraMode, Config, Device, Engine, HemisphereLights, Instance,
    Light, Material, Mesh, Params,
};

const FRAMES: u32 = 64;

#[derive(Debug)]
struct DemoParams;

impl Params for DemoParams {
    type MeshHandle = &'static str;
    type MaterialHandle = &'static str;
    type InstanceHandle = usize;
    type LightHandle = &'static str;
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let device = Device::default();
    let mut engine = Engine::<DemoParams>::new(&device)?;

    engine.add_mesh("floor", Mesh::quad(10.0, 10.0));
    engine.add_mesh("cube", Mesh::cube(1.0));
    engine.add_mesh("cube-lod1", Mesh::cube(0.9));

    engine.add_material(
        "floor",
        Material::default().with_base_color(vec3(0.6, 0.6, 0.6)),
    );

    engine.add_material(
        "crimson",
        Material::default().with_base_color(vec3(0.86, 0.08, 0.24)),
    );

    engine.add_material(
        "gold",
        Material::default()
            .with_base_color(vec3(1.0, 0.84, 0.0))
            .with_perceptual_roughness(0.3)
            .with_specular(vec3(0.5, 0.5, 0.5)),
    );

    engine.add_instance(
        0,
        Instance::new("floor", "floor", Affine3A::IDENTITY),
    );

    engine.add_instance(1, cube("crimson", 0.0, 0));
    engine.add_instance(2, cube("gold", 0.5, 0));

    engine.set_hemisphere_lights(Some(HemisphereLights {
        center: Vec3::ZERO,
        radius: 6.0,
        count: 10,
        intensity: 25.0,
        ..Default::default()
    }));

    engine.add_light(
        "house",
        Light::new(vec3(0.0, 3.0, 0.0), Vec3::NEG_Y)
            .with_size(vec2(1.0, 1.0))
            .with_color(vec3(1.0, 0.9, 0.8))
            .with_intensity(50.0),
    );

    let camera = Camera::new(uvec2(320, 240))
        .with_mode(CameraMode::Image)
        .with_look_at(vec3(0.0, 4.0, 6.0), Vec3::ZERO, Vec3::Y);

    let config = Config {
        ambient: 0.05,
        background: vec3(0.05, 0.07, 0.1),
        ..Default::default()
    };

    let mut controller = engine.create_camera(&device, camera, config)?;

    for frame in 0..FRAMES {
        let t = frame as f32 / FRAMES as f32;
        let lod = (frame / 16 % 2) as usize;

        engine.add_instance(1, cube("crimson", t, lod));
        engine.add_instance(2, cube("gold", t + 0.5, lod));

        engine.tick(&device)?;
        controller.render(&engine, &device)?;
        controller.flush();
    }

    log::info!("Rendered {FRAMES} frames; {:?}", device.stats());

    image::DynamicImage::ImageRgba32F(controller.to_image())
        .into_rgba8()
        .save("demo.png")?;

    log::info!("Saved demo.png");

    Ok(())
}

/// Cube orbiting around the origin; `phase` goes from 0.0 to 1.0 per orbit.
fn cube(
    material: &'static str,
    phase: f32,
    lod: usize,
) -> Instance<DemoParams> {
    let angle = phase * TAU;

    let xform = Affine3A::from_rotation_translation(
        Quat::from_rotation_y(angle),
        vec3(2.0 * angle.cos(), 0.5, 2.0 * angle.sin()),
    );

    Instance::new("cube", material, xform)
        .with_lods(["cube", "cube-lod1"])
        .with_lod(lod)
}
