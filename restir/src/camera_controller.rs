mod buffers;
mod pass;
mod passes;

use glam::{uvec2, UVec2};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use self::buffers::*;
pub use self::pass::*;
pub use self::passes::*;
use crate::{
    gpu, Camera, Config, Device, Engine, Error, Params, ResourceTracker,
    Result, Texture,
};

/// Pipeline of a single camera: owns its resolution-dependent resources and
/// drives the passes frame after frame.
///
/// Each frame consists of [`Self::render()`] followed by [`Self::flush()`].
#[derive(Debug)]
pub struct CameraController {
    camera: Camera,
    config: Config,
    buffers: CameraBuffers,
    passes: CameraPasses,
    tracker: ResourceTracker,
    rng: StdRng,
    frame: gpu::Frame,

    /// Parity of the current frame; selects which half of the history gets
    /// written and which gets read.
    alternate: bool,
}

impl CameraController {
    pub(crate) fn new<P>(
        engine: &Engine<P>,
        device: &Device,
        camera: Camera,
        config: Config,
    ) -> Result<Self>
    where
        P: Params,
    {
        info!("Creating camera: {}", camera.describe());

        device.ensure_raytracing()?;
        config.validate()?;
        Self::validate_viewport(device, camera.viewport)?;

        let buffers = CameraBuffers::new(device, &camera)?;
        let passes = CameraPasses::new();
        let rng = StdRng::seed_from_u64(config.seed);

        debug!(
            "Camera created; lights={}, materials={}",
            engine.lights.len(),
            engine.materials.len(),
        );

        Ok(Self {
            camera,
            config,
            buffers,
            passes,
            tracker: Default::default(),
            rng,
            frame: Default::default(),
            alternate: false,
        })
    }

    fn validate_viewport(device: &Device, viewport: UVec2) -> Result<()> {
        if viewport.x == 0 || viewport.y == 0 {
            return Err(Error::invalid_config(format!(
                "viewport must not be empty, got {}x{}",
                viewport.x, viewport.y
            )));
        }

        let max = device.descriptor().max_texture_dimension;

        if viewport.x > max || viewport.y > max {
            return Err(Error::UnsupportedDevice {
                device: device.label().to_owned(),
                reason: format!(
                    "viewport {}x{} exceeds the maximum texture dimension \
                     ({max})",
                    viewport.x, viewport.y
                ),
            });
        }

        Ok(())
    }

    /// Updates the camera; when the new camera has a different viewport, the
    /// resources get re-created and the history starts over.
    pub fn update(&mut self, device: &Device, camera: Camera) -> Result<()> {
        let needs_rebuilding = self.camera.is_invalidated_by(&camera);

        if needs_rebuilding {
            Self::validate_viewport(device, camera.viewport)?;
        }

        self.camera = camera;

        if needs_rebuilding {
            self.rebuild_buffers(device)?;
        } else {
            *self.buffers.curr_camera = self.camera.serialize();
        }

        Ok(())
    }

    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;

        if config.seed != self.config.seed {
            self.rng = StdRng::seed_from_u64(config.seed);
        }

        self.config = config;

        Ok(())
    }

    /// Re-creates all resources on given device, restarting the pipeline
    /// cold; used to recover from a lost device.
    pub fn recreate(&mut self, device: &Device) -> Result<()> {
        info!("Re-creating camera: {}", self.camera.describe());

        device.ensure_raytracing()?;
        Self::validate_viewport(device, self.camera.viewport)?;
        self.rebuild_buffers(device)
    }

    fn rebuild_buffers(&mut self, device: &Device) -> Result<()> {
        debug!("Rebuilding buffers for camera: {}", self.camera.describe());

        self.buffers = CameraBuffers::new(device, &self.camera)?;
        self.tracker.reset();
        self.frame = Default::default();
        self.alternate = false;

        Ok(())
    }

    /// Runs all passes for the current frame.
    pub fn render<P>(
        &mut self,
        engine: &Engine<P>,
        device: &Device,
    ) -> Result<()>
    where
        P: Params,
    {
        let alternate = self.alternate;
        let config = &self.config;

        self.passes.generation.run(
            engine,
            device,
            &mut self.tracker,
            &mut self.buffers,
            gpu::GenerationPassParams {
                seed: self.rng.gen(),
                frame: self.frame,
                candidate_count: config.candidate_count,
                light_sampling: config.light_sampling.to_bits(),
            },
        )?;

        if config.temporal {
            self.passes.temporal_resampling.run(
                engine,
                device,
                &mut self.tracker,
                &mut self.buffers,
                alternate,
                gpu::TemporalResamplingPassParams {
                    seed: self.rng.gen(),
                    frame: self.frame,
                    max_history: config.max_history,
                    normal_threshold: config.temporal_normal_threshold,
                    depth_threshold: config.temporal_depth_threshold,
                    _padding: Default::default(),
                },
            )?;
        }

        if config.spatial {
            self.passes.spatial_resampling.run(
                engine,
                device,
                &mut self.tracker,
                &mut self.buffers,
                gpu::SpatialResamplingPassParams {
                    seed: self.rng.gen(),
                    sample_count: config.spatial_sample_count,
                    max_history: config.max_history,
                    radius: config.spatial_radius,
                    min_radius: config.spatial_min_radius,
                    normal_threshold: config.spatial_normal_threshold,
                    depth_threshold: config.spatial_depth_threshold,
                    _padding: Default::default(),
                },
            )?;
        }

        self.passes.resolving.run(
            engine,
            device,
            &mut self.tracker,
            &mut self.buffers,
            alternate,
            gpu::ResolvingPassParams {
                mode: self.camera.mode.serialize().to_bits(),
                shadow_rays: config.shadow_rays as u32,
                max_history: config.max_history,
                ambient: config.ambient,
                background: config.background.extend(0.0).to_array(),
            },
        )?;

        self.tracker.flush(device)?;
        device.wait_idle()
    }

    /// Finishes the frame: the current camera becomes the previous one and
    /// the history rotates.
    pub fn flush(&mut self) {
        *self.buffers.prev_camera = *self.buffers.curr_camera;
        self.frame = self.frame.next();
        self.alternate = !self.alternate;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame(&self) -> gpu::Frame {
        self.frame
    }

    pub fn alternate(&self) -> bool {
        self.alternate
    }

    pub fn buffers(&self) -> &CameraBuffers {
        &self.buffers
    }

    /// Final image of the last rendered frame.
    pub fn color(&self) -> &Texture {
        &self.buffers.color
    }

    pub fn to_image(&self) -> image::Rgba32FImage {
        let color = self.color();
        let size = color.size();

        image::Rgba32FImage::from_fn(size.x, size.y, |x, y| {
            image::Rgba(color.get(uvec2(x, y)).to_array())
        })
    }

    /// Returns the final reservoir of given pixel from the last rendered
    /// frame.
    pub fn reservoir(&self, pos: UVec2) -> Option<gpu::DiReservoir> {
        if pos.x >= self.camera.viewport.x || pos.y >= self.camera.viewport.y
        {
            return None;
        }

        let idx = self.buffers.curr_camera.screen_to_idx(pos);

        self.buffers
            .reservoirs
            .src()
            .data()
            .get(idx)
            .map(|data| gpu::DiReservoir::deserialize(*data))
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        info!("Deleting camera: {}", self.camera.describe());
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec2, vec3, Affine3A, Vec3, Vec4, Vec4Swizzles};

    use super::*;
    use crate::{
        DeviceDescriptor, Instance, Light, Material, Mesh, RaytracingTier,
        Resource, ResourceState,
    };

    #[derive(Debug)]
    struct TestParams;

    impl Params for TestParams {
        type MeshHandle = u32;
        type MaterialHandle = u32;
        type InstanceHandle = u32;
        type LightHandle = u32;
    }

    const CENTER: UVec2 = uvec2(8, 8);

    fn camera() -> Camera {
        Camera::new(uvec2(16, 16)).with_look_at(
            vec3(0.0, 4.0, 4.0),
            Vec3::ZERO,
            Vec3::Y,
        )
    }

    /// Floor lit by a single area light hanging above it.
    fn engine(device: &Device) -> Engine<TestParams> {
        let mut engine = Engine::new(device).unwrap();

        engine.add_mesh(0, Mesh::quad(8.0, 8.0));
        engine.add_mesh(1, Mesh::quad(1.0, 1.0));
        engine.add_material(0, Material::default());
        engine.add_instance(0, Instance::new(0, 0, Affine3A::IDENTITY));

        engine.add_light(
            0,
            Light::new(vec3(0.0, 3.0, 0.0), Vec3::NEG_Y)
                .with_size(vec2(2.0, 2.0))
                .with_intensity(10.0),
        );

        engine.tick(device).unwrap();
        engine
    }

    fn frame(
        engine: &mut Engine<TestParams>,
        device: &Device,
        target: &mut CameraController,
    ) {
        engine.tick(device).unwrap();
        target.render(engine, device).unwrap();
        target.flush();
    }

    fn mse(lhs: &[Vec4], rhs: &[Vec4]) -> f32 {
        let sum: f32 = lhs
            .iter()
            .zip(rhs)
            .map(|(lhs, rhs)| (lhs.xyz() - rhs.xyz()).length_squared())
            .sum();

        sum / lhs.len() as f32
    }

    fn m_at(target: &CameraController, pos: UVec2) -> f32 {
        target.reservoir(pos).unwrap().m
    }

    #[test]
    fn invalid_viewport() {
        let device = Device::default();
        let engine = engine(&device);

        assert!(matches!(
            engine.create_camera(
                &device,
                Camera::new(uvec2(0, 16)),
                Default::default()
            ),
            Err(Error::InvalidConfig { .. })
        ));

        assert!(matches!(
            engine.create_camera(
                &device,
                Camera::new(uvec2(32768, 16)),
                Default::default()
            ),
            Err(Error::UnsupportedDevice { .. })
        ));
    }

    #[test]
    fn unsupported_device() {
        let device = Device::default();
        let engine = engine(&device);

        let device = Device::new(DeviceDescriptor {
            raytracing_tier: RaytracingTier::NotSupported,
            ..Default::default()
        });

        assert!(matches!(
            engine.create_camera(&device, camera(), Default::default()),
            Err(Error::UnsupportedDevice { .. })
        ));
    }

    #[test]
    fn out_of_memory() {
        let device = Device::default();
        let engine = engine(&device);

        let device = Device::new(DeviceDescriptor {
            memory_budget: 1024,
            ..Default::default()
        });

        assert!(matches!(
            engine.create_camera(&device, camera(), Default::default()),
            Err(Error::OutOfMemory { .. })
        ));
    }

    #[test]
    fn render() {
        let device = Device::default();
        let mut engine = engine(&device);

        let mut target = engine
            .create_camera(&device, camera(), Default::default())
            .unwrap();

        frame(&mut engine, &device, &mut target);

        // Floor right below the light is lit
        let color = target.color().get(CENTER);

        assert!(color.x > 0.0);
        assert!(color.x.is_finite());

        // ... while the sky is not
        assert_eq!(Vec4::ZERO, target.color().get(uvec2(8, 0)));

        // All barriers got flushed and resources ended up readable
        assert!(target.tracker.pending().is_empty());
        assert_eq!(ResourceState::Readable, target.color().state());

        let image = target.to_image();

        assert_eq!((16, 16), image.dimensions());
        assert_eq!(color.x, image.get_pixel(8, 8).0[0]);
    }

    #[test]
    fn history_is_capped_and_rotated() {
        let device = Device::default();
        let mut engine = engine(&device);

        let config = Config {
            candidate_count: 8,
            max_history: 20.0,
            ..Default::default()
        };

        let mut target =
            engine.create_camera(&device, camera(), config).unwrap();

        for frame_idx in 0..10 {
            assert_eq!(frame_idx, target.frame().get());
            assert_eq!(frame_idx % 2 == 1, target.alternate());

            engine.tick(&device).unwrap();
            target.render(&engine, &device).unwrap();

            for y in 0..16 {
                for x in 0..16 {
                    let reservoir = target.reservoir(uvec2(x, y)).unwrap();

                    assert!(reservoir.m <= 20.0);
                    assert!(reservoir.w_sum >= 0.0);
                    assert!(reservoir.w >= 0.0);
                }
            }

            target.flush();
        }

        assert!(target.reservoir(uvec2(16, 0)).is_none());
    }

    #[test]
    fn barriers_are_issued_only_on_state_changes() {
        let device = Device::default();
        let mut engine = engine(&device);

        let mut target = engine
            .create_camera(&device, camera(), Default::default())
            .unwrap();

        frame(&mut engine, &device, &mut target);
        frame(&mut engine, &device, &mut target);

        let barriers_before = device.stats().barriers;

        frame(&mut engine, &device, &mut target);

        let barriers_per_frame = device.stats().barriers - barriers_before;

        // Each pass flips its outputs to writable and, once it's done, back
        // to readable
        let expected = 2 * (6 + 1 + 1 + 4);

        assert_eq!(expected, barriers_per_frame);
    }

    #[test]
    fn temporal_reuse_accumulates_history() {
        let device = Device::default();
        let mut engine = engine(&device);

        let config = Config {
            candidate_count: 8,
            max_history: 40.0,
            spatial: false,
            ..Default::default()
        };

        let mut target =
            engine.create_camera(&device, camera(), config).unwrap();

        for expected in [8.0, 16.0, 24.0, 32.0, 40.0, 40.0] {
            frame(&mut engine, &device, &mut target);

            assert_eq!(expected, m_at(&target, CENTER));
        }
    }

    #[test]
    fn history_is_discarded_on_occlusion() {
        let device = Device::default();
        let mut engine = engine(&device);

        let config = Config {
            candidate_count: 8,
            max_history: 40.0,
            spatial: false,
            ..Default::default()
        };

        let mut target =
            engine.create_camera(&device, camera(), config).unwrap();

        for _ in 0..3 {
            frame(&mut engine, &device, &mut target);
        }

        assert_eq!(24.0, m_at(&target, CENTER));

        // A plate appears between the camera and the floor
        engine.add_instance(
            1,
            Instance::new(
                1,
                0,
                Affine3A::from_translation(vec3(0.0, 2.0, 2.0)),
            ),
        );

        frame(&mut engine, &device, &mut target);

        assert_eq!(8.0, m_at(&target, CENTER));

        frame(&mut engine, &device, &mut target);

        assert_eq!(16.0, m_at(&target, CENTER));

        // ... and disappears, revealing the floor again
        engine.remove_instance(&1);

        frame(&mut engine, &device, &mut target);

        assert_eq!(8.0, m_at(&target, CENTER));

        frame(&mut engine, &device, &mut target);

        assert_eq!(16.0, m_at(&target, CENTER));
    }

    #[test]
    fn convergence() {
        let device = Device::default();
        let mut engine = engine(&device);

        // Reference: average of many independent frames
        let mut reference = engine
            .create_camera(
                &device,
                camera(),
                Config {
                    temporal: false,
                    spatial: false,
                    seed: 1234,
                    ..Default::default()
                },
            )
            .unwrap();

        let mut expected = vec![Vec4::ZERO; 16 * 16];

        for _ in 0..256 {
            frame(&mut engine, &device, &mut reference);

            for (expected, color) in
                expected.iter_mut().zip(reference.color().data())
            {
                *expected += *color / 256.0;
            }
        }

        let mut target = engine
            .create_camera(
                &device,
                camera(),
                Config {
                    candidate_count: 4,
                    max_history: 100.0,
                    spatial: false,
                    ..Default::default()
                },
            )
            .unwrap();

        frame(&mut engine, &device, &mut target);

        let first_error = mse(&expected, target.color().data());

        for _ in 0..99 {
            frame(&mut engine, &device, &mut target);
        }

        let last_error = mse(&expected, target.color().data());

        assert!(
            last_error < first_error,
            "error didn't decrease: {first_error} -> {last_error}"
        );
    }

    #[test]
    fn deterministic() {
        let device = Device::default();
        let mut engine = engine(&device);

        let config = Config {
            seed: 42,
            ..Default::default()
        };

        let mut lhs = engine
            .create_camera(&device, camera(), config.clone())
            .unwrap();

        let mut rhs = engine.create_camera(&device, camera(), config).unwrap();

        for _ in 0..3 {
            engine.tick(&device).unwrap();
            lhs.render(&engine, &device).unwrap();
            rhs.render(&engine, &device).unwrap();
            lhs.flush();
            rhs.flush();

            assert_eq!(lhs.color().data(), rhs.color().data());
        }
    }

    #[test]
    fn resolution_change() {
        let device = Device::default();
        let mut engine = engine(&device);

        let config = Config {
            candidate_count: 8,
            spatial: false,
            ..Default::default()
        };

        let mut target =
            engine.create_camera(&device, camera(), config).unwrap();

        frame(&mut engine, &device, &mut target);
        frame(&mut engine, &device, &mut target);

        assert_eq!(16.0, m_at(&target, CENTER));

        // Same viewport - history survives
        target.update(&device, camera()).unwrap();

        assert_eq!(2, target.frame().get());

        // Different viewport - history starts over
        let camera = Camera::new(uvec2(32, 32)).with_look_at(
            vec3(0.0, 4.0, 4.0),
            Vec3::ZERO,
            Vec3::Y,
        );

        target.update(&device, camera).unwrap();

        assert_eq!(0, target.frame().get());

        frame(&mut engine, &device, &mut target);

        assert_eq!(uvec2(32, 32), target.color().size());
        assert_eq!(8.0, m_at(&target, uvec2(16, 16)));
    }

    #[test]
    fn device_loss() {
        let device = Device::default();
        let mut engine = engine(&device);

        let config = Config {
            candidate_count: 8,
            spatial: false,
            ..Default::default()
        };

        let mut target =
            engine.create_camera(&device, camera(), config).unwrap();

        frame(&mut engine, &device, &mut target);
        frame(&mut engine, &device, &mut target);

        device.lose();

        assert!(matches!(
            target.render(&engine, &device),
            Err(Error::DeviceLost)
        ));

        // Recovery goes through a brand new device and starts cold
        let device = Device::default();

        engine.recreate(&device).unwrap();
        target.recreate(&device).unwrap();

        assert_eq!(0, target.frame().get());

        frame(&mut engine, &device, &mut target);

        assert_eq!(8.0, m_at(&target, CENTER));
        assert_eq!(ResourceState::Readable, target.color().state());
    }
}
