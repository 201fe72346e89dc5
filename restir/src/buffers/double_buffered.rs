use bytemuck::Pod;
use glam::UVec2;

use crate::{Device, Result, StorageBuffer, Texture};

/// Pair of resources where one holds the current frame's data and the other
/// one the previous frame's data; which one is which depends on the frame's
/// parity, as given by [`crate::CameraController`].
#[derive(Debug)]
pub struct DoubleBuffered<T> {
    a: T,
    b: T,
}

impl DoubleBuffered<Texture> {
    /// Creates a double-buffered texture.
    ///
    /// See: [`Texture::new()`].
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        size: UVec2,
    ) -> Result<Self> {
        let label = label.as_ref();

        Ok(Self {
            a: Texture::new(device, format!("{label}_a"), size)?,
            b: Texture::new(device, format!("{label}_b"), size)?,
        })
    }
}

impl<T> DoubleBuffered<StorageBuffer<T>>
where
    T: Pod,
{
    /// Creates a double-buffered storage buffer.
    ///
    /// See: [`StorageBuffer::new()`].
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        len: usize,
    ) -> Result<Self> {
        let label = label.as_ref();

        Ok(Self {
            a: StorageBuffer::new(device, format!("{label}_a"), len)?,
            b: StorageBuffer::new(device, format!("{label}_b"), len)?,
        })
    }
}

impl<T> DoubleBuffered<T> {
    pub fn get(&self, alternate: bool) -> &T {
        if alternate {
            &self.b
        } else {
            &self.a
        }
    }

    pub fn get_mut(&mut self, alternate: bool) -> &mut T {
        if alternate {
            &mut self.b
        } else {
            &mut self.a
        }
    }

    /// Returns the resource written during the current frame.
    pub fn curr(&self, alternate: bool) -> &T {
        self.get(alternate)
    }

    pub fn curr_mut(&mut self, alternate: bool) -> &mut T {
        self.get_mut(alternate)
    }

    /// Returns the resource written during the previous frame.
    pub fn prev(&self, alternate: bool) -> &T {
        self.get(!alternate)
    }
}
