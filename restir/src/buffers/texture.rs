use std::cell::Cell;
use std::mem;

use glam::{UVec2, Vec4};
use log::debug;

use crate::{Allocation, Device, Resource, ResourceState, Result};

/// Two-dimensional, `Rgba32Float` texture.
#[derive(Debug)]
pub struct Texture {
    label: String,
    size: UVec2,
    data: Vec<Vec4>,
    state: Cell<ResourceState>,
    _alloc: Allocation,
}

impl Texture {
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        size: UVec2,
    ) -> Result<Self> {
        let label = label.as_ref();

        debug!("Allocating texture `{label}`; size={size}");

        let len = (size.x * size.y) as usize;
        let alloc = device.allocate(label, len * mem::size_of::<Vec4>())?;

        Ok(Self {
            label: label.to_owned(),
            size,
            data: vec![Vec4::ZERO; len],
            state: Default::default(),
            _alloc: alloc,
        })
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn data(&self) -> &[Vec4] {
        &self.data
    }

    pub fn get(&self, pos: UVec2) -> Vec4 {
        self.data[(pos.y * self.size.x + pos.x) as usize]
    }

    /// Overwrites texels in row-major order.
    pub fn write(&mut self, texels: impl IntoIterator<Item = Vec4>) {
        debug_assert_eq!(
            ResourceState::Writable,
            self.state.get(),
            "texture `{}` is not writable",
            self.label,
        );

        for (dst, src) in self.data.iter_mut().zip(texels) {
            *dst = src;
        }
    }
}

impl Resource for Texture {
    fn label(&self) -> &str {
        &self.label
    }

    fn state(&self) -> ResourceState {
        self.state.get()
    }

    fn set_state(&self, state: ResourceState) {
        self.state.set(state);
    }
}

#[cfg(test)]
mod tests {
    use glam::{uvec2, vec4};

    use super::*;
    use crate::{Error, ResourceTracker};

    #[test]
    fn write() {
        let device = Device::default();
        let mut tracker = ResourceTracker::default();
        let mut target = Texture::new(&device, "test", uvec2(2, 2)).unwrap();

        assert_eq!(4 * 16, device.stats().allocated);
        assert_eq!(Vec4::ZERO, target.get(uvec2(1, 1)));

        tracker.transition(&target, ResourceState::Writable);

        target.write((0..4).map(|idx| vec4(idx as f32, 0.0, 0.0, 0.0)));

        assert_eq!(vec4(1.0, 0.0, 0.0, 0.0), target.get(uvec2(1, 0)));
        assert_eq!(vec4(3.0, 0.0, 0.0, 0.0), target.get(uvec2(1, 1)));

        drop(target);

        assert_eq!(0, device.stats().allocated);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "texture `test` is not writable")]
    fn write_without_transition() {
        let device = Device::default();
        let mut target = Texture::new(&device, "test", uvec2(1, 1)).unwrap();

        target.write([Vec4::ONE]);
    }

    #[test]
    fn out_of_memory() {
        let device = Device::new(crate::DeviceDescriptor {
            memory_budget: 1024,
            ..Default::default()
        });

        let result = Texture::new(&device, "test", uvec2(16, 16));

        assert!(matches!(result, Err(Error::OutOfMemory { .. })));
    }
}
