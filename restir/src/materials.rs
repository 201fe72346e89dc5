use std::mem;

use fxhash::FxHashMap;

use crate::{gpu, Device, Material, Params, Result, StorageBuffer};

#[derive(Debug)]
pub struct Materials<P>
where
    P: Params,
{
    materials: FxHashMap<P::MaterialHandle, Material>,
    index: FxHashMap<P::MaterialHandle, gpu::MaterialId>,
    buffer: StorageBuffer<gpu::Material>,
    dirty: bool,
}

impl<P> Materials<P>
where
    P: Params,
{
    pub fn new(device: &Device) -> Result<Self> {
        Ok(Self {
            materials: Default::default(),
            index: Default::default(),
            buffer: StorageBuffer::new(device, "restir_materials", 0)?,
            dirty: false,
        })
    }

    pub fn insert(
        &mut self,
        material_handle: P::MaterialHandle,
        material: Material,
    ) {
        self.materials.insert(material_handle, material);
        self.dirty = true;
    }

    pub fn remove(&mut self, material_handle: &P::MaterialHandle) {
        if self.materials.remove(material_handle).is_some() {
            self.dirty = true;
        }
    }

    pub fn lookup(
        &self,
        material_handle: &P::MaterialHandle,
    ) -> Option<gpu::MaterialId> {
        self.index.get(material_handle).copied()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn buffer(&self) -> &StorageBuffer<gpu::Material> {
        &self.buffer
    }

    /// Uploads materials changed since the last flush.
    pub fn flush(&mut self, device: &Device) -> Result<()> {
        if !mem::take(&mut self.dirty) {
            return Ok(());
        }

        self.index.clear();

        let materials = self
            .materials
            .iter()
            .enumerate()
            .map(|(material_id, (material_handle, material))| {
                self.index.insert(
                    *material_handle,
                    gpu::MaterialId::new(material_id as u32),
                );

                material.serialize()
            })
            .collect();

        self.buffer.write_all(device, materials)
    }

    /// Re-creates the device-side buffer, e.g. after the device got lost.
    pub fn recreate(&mut self, device: &Device) -> Result<()> {
        self.buffer = StorageBuffer::new(device, "restir_materials", 0)?;
        self.dirty = true;
        self.flush(device)
    }
}
