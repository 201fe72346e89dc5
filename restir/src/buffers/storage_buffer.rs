use std::any;
use std::cell::Cell;
use std::mem;

use bytemuck::Pod;
use log::debug;

use crate::{Allocation, Device, Resource, ResourceState, Result};

/// Array of `Pod` items living on the device.
#[derive(Debug)]
pub struct StorageBuffer<T> {
    label: String,
    data: Vec<T>,
    state: Cell<ResourceState>,
    alloc: Allocation,
}

impl<T> StorageBuffer<T>
where
    T: Pod,
{
    /// Creates a zero-initialized buffer of `len` items.
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        len: usize,
    ) -> Result<Self> {
        let label = label.as_ref();

        debug!(
            "Allocating storage buffer `{label}`; ty={}, len={len}",
            any::type_name::<T>(),
        );

        let alloc = device.allocate(label, len * mem::size_of::<T>())?;

        Ok(Self {
            label: label.to_owned(),
            data: vec![T::zeroed(); len],
            state: Default::default(),
            alloc,
        })
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.alloc.size()
    }

    /// Overwrites items, starting from the first one; used by passes.
    pub fn write(&mut self, items: impl IntoIterator<Item = T>) {
        debug_assert_eq!(
            ResourceState::Writable,
            self.state.get(),
            "storage buffer `{}` is not writable",
            self.label,
        );

        for (dst, src) in self.data.iter_mut().zip(items) {
            *dst = src;
        }
    }

    /// Replaces the entire buffer's contents with `items`, growing or
    /// shrinking the buffer if needed; used to upload data from the host.
    pub fn write_all(&mut self, device: &Device, items: Vec<T>) -> Result<()> {
        device.ensure_not_lost()?;

        if items.len() != self.data.len() {
            debug!(
                "Reallocating storage buffer `{}`; len={} -> {}",
                self.label,
                self.data.len(),
                items.len(),
            );

            // Old memory has to be released before the new one is reserved
            self.alloc = device.allocate(&self.label, 0)?;
            self.data.clear();

            self.alloc = device
                .allocate(&self.label, items.len() * mem::size_of::<T>())?;
        }

        self.data = items;

        Ok(())
    }
}

impl<T> Resource for StorageBuffer<T> {
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
