use bytemuck::Pod;

use crate::{Device, Result, StorageBuffer};

/// Pair of resources where one is read while the other one is written, with
/// their roles swapped after each write.
///
/// Unlike [`crate::DoubleBuffered`], the roles change within a frame - once
/// per pass writing into the pair.
#[derive(Debug)]
pub struct PingPong<T> {
    items: [T; 2],
    flipped: bool,
}

impl<T> PingPong<StorageBuffer<T>>
where
    T: Pod,
{
    pub fn new(
        device: &Device,
        label: impl AsRef<str>,
        len: usize,
    ) -> Result<Self> {
        let label = label.as_ref();

        Ok(Self {
            items: [
                StorageBuffer::new(device, format!("{label}_ping"), len)?,
                StorageBuffer::new(device, format!("{label}_pong"), len)?,
            ],
            flipped: false,
        })
    }
}

impl<T> PingPong<T> {
    /// Returns the resource that was written most recently.
    pub fn src(&self) -> &T {
        &self.items[self.flipped as usize]
    }

    /// Returns the resource that's going to be written next.
    pub fn dst(&self) -> &T {
        &self.items[!self.flipped as usize]
    }

    /// Returns the source and the destination at once.
    pub fn split(&mut self) -> (&T, &mut T) {
        let [a, b] = &mut self.items;

        if self.flipped {
            (&*b, a)
        } else {
            (&*a, b)
        }
    }

    /// Swaps roles; called after the destination got written.
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }
}
