//! Real-time ReSTIR direct lighting.
//!
//! [`Engine`] holds the scene (meshes, materials, instances and lights),
//! while each [`CameraController`] runs the per-frame pipeline of a single
//! camera: generation, temporal resampling, spatial resampling and resolving.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::new_without_default)]

mod buffers;
mod camera;
mod camera_controller;
mod config;
mod device;
mod error;
mod instance;
mod instances;
mod light;
mod lights;
mod material;
mod materials;
mod mesh;
mod mesh_triangle;
mod meshes;
mod params;
mod utils;

use glam::Affine3A;
use log::{debug, info};
pub use restir_gpu as gpu;

pub use self::buffers::*;
pub use self::camera::*;
pub use self::camera_controller::*;
pub use self::config::*;
pub use self::device::*;
pub use self::error::*;
pub use self::instance::*;
pub(crate) use self::instances::*;
pub use self::light::*;
pub(crate) use self::lights::*;
pub use self::material::*;
pub(crate) use self::materials::*;
pub use self::mesh::*;
pub use self::mesh_triangle::*;
pub(crate) use self::meshes::*;
pub use self::params::*;

#[derive(Debug)]
pub struct Engine<P>
where
    P: Params,
{
    meshes: Meshes<P>,
    pub(crate) materials: Materials<P>,
    instances: Instances<P>,
    pub(crate) lights: Lights<P>,
    pub(crate) triangles: StorageBuffer<gpu::Triangle>,
}

impl<P> Engine<P>
where
    P: Params,
{
    pub fn new(device: &Device) -> Result<Self> {
        info!("Initializing engine on device `{}`", device.label());

        device.ensure_raytracing()?;

        Ok(Self {
            meshes: Default::default(),
            materials: Materials::new(device)?,
            instances: Default::default(),
            lights: Lights::new(device)?,
            triangles: StorageBuffer::new(device, "restir_triangles", 0)?,
        })
    }

    pub fn add_mesh(&mut self, mesh_handle: P::MeshHandle, mesh: Mesh) {
        self.meshes.insert(mesh_handle, mesh);
    }

    pub fn remove_mesh(&mut self, mesh_handle: &P::MeshHandle) {
        self.meshes.remove(mesh_handle);
    }

    pub fn add_material(
        &mut self,
        material_handle: P::MaterialHandle,
        material: Material,
    ) {
        self.materials.insert(material_handle, material);
    }

    pub fn remove_material(&mut self, material_handle: &P::MaterialHandle) {
        self.materials.remove(material_handle);
    }

    /// Adds or updates an instance.
    ///
    /// Updating keeps the instance's previous transform and level of detail
    /// (used for motion vectors) until the next [`Self::tick()`].
    pub fn add_instance(
        &mut self,
        instance_handle: P::InstanceHandle,
        instance: Instance<P>,
    ) {
        self.instances.add(instance_handle, instance);
    }

    /// Moves an existing instance; does nothing if the instance doesn't exist.
    pub fn set_instance_xform(
        &mut self,
        instance_handle: P::InstanceHandle,
        xform: Affine3A,
    ) {
        if let Some(instance) = self.instances.get(&instance_handle) {
            let instance = instance.clone().with_xform(xform);

            self.instances.add(instance_handle, instance);
        }
    }

    /// Switches the level of detail of an existing instance; does nothing if
    /// the instance doesn't exist.
    pub fn set_instance_lod(
        &mut self,
        instance_handle: P::InstanceHandle,
        lod: usize,
    ) {
        if let Some(instance) = self.instances.get(&instance_handle) {
            let instance = instance.clone().with_lod(lod);

            self.instances.add(instance_handle, instance);
        }
    }

    pub fn remove_instance(&mut self, instance_handle: &P::InstanceHandle) {
        self.instances.remove(instance_handle);
    }

    pub fn add_light(&mut self, light_handle: P::LightHandle, light: Light) {
        self.lights.add(light_handle, light);
    }

    pub fn remove_light(&mut self, light_handle: &P::LightHandle) {
        self.lights.remove(light_handle);
    }

    /// Enables (or, given `None`, disables) the procedural hemisphere of
    /// lights.
    pub fn set_hemisphere_lights(
        &mut self,
        hemisphere: Option<HemisphereLights>,
    ) {
        self.lights.set_hemisphere(hemisphere);
    }

    /// Uploads the scene for the upcoming frame; must be called once per
    /// frame, before rendering any camera.
    pub fn tick(&mut self, device: &Device) -> Result<()> {
        self.materials.flush(device)?;
        self.lights.flush(device)?;

        let triangles = self.instances.build(&self.meshes, &self.materials);

        debug!(
            "Uploading scene; triangles={}, lights={}",
            triangles.len(),
            self.lights.len()
        );

        self.triangles.write_all(device, triangles)?;
        self.instances.commit();

        Ok(())
    }

    /// Re-creates all device-side buffers, e.g. after the device got lost;
    /// the scene itself is kept.
    pub fn recreate(&mut self, device: &Device) -> Result<()> {
        info!("Re-creating engine on device `{}`", device.label());

        device.ensure_raytracing()?;

        self.materials.recreate(device)?;
        self.lights.recreate(device)?;
        self.triangles = StorageBuffer::new(device, "restir_triangles", 0)?;

        Ok(())
    }

    pub fn create_camera(
        &self,
        device: &Device,
        camera: Camera,
        config: Config,
    ) -> Result<CameraController> {
        CameraController::new(self, device, camera, config)
    }

    pub fn triangles(&self) -> &[gpu::Triangle] {
        self.triangles.data()
    }

    pub fn lights(&self) -> &[gpu::AreaLight] {
        self.lights.buffer().data()
    }
}
