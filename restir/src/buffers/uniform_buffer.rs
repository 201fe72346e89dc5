use std::cell::Cell;
use std::mem;
use std::ops::{Deref, DerefMut};

use bytemuck::Pod;
use log::debug;

use crate::{Allocation, Device, Resource, ResourceState, Result};

/// Single `Pod` value living on the device, written by the host.
#[derive(Debug)]
pub struct UniformBuffer<T> {
    label: String,
    value: T,
    state: Cell<ResourceState>,
    _alloc: Allocation,
}

impl<T> UniformBuffer<T>
where
    T: Pod,
{
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        value: T,
    ) -> Result<Self> {
        let label = label.as_ref();

        debug!("Allocating uniform buffer `{label}`");

        let alloc = device.allocate(label, mem::size_of::<T>())?;

        Ok(Self {
            label: label.to_owned(),
            value,
            state: Default::default(),
            _alloc: alloc,
        })
    }
}

impl<T> Deref for UniformBuffer<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for UniformBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T> Resource for UniformBuffer<T> {
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
