use std::marker::PhantomData;

use bytemuck::Pod;
use glam::UVec2;
use log::debug;

use crate::utils::measure;
use crate::{Device, Resource, ResourceState, ResourceTracker, Result};

/// Per-pixel pass, parametrized with a constant block of type `P`.
#[derive(Debug)]
pub struct CameraComputePass<P> {
    label: String,
    _params: PhantomData<P>,
}

impl<P> CameraComputePass<P>
where
    P: Pod + Sync,
{
    pub fn new(label: impl ToString) -> Self {
        let label = label.to_string();

        debug!("Initializing pass: {label}");

        Self {
            label,
            _params: PhantomData,
        }
    }

    /// Transitions `reads` into [`ResourceState::Readable`] and `writes` into
    /// [`ResourceState::Writable`], and then invokes `kernel` for each pixel.
    ///
    /// Kernel's outputs are returned in row-major order; once the caller
    /// stores them, it should call [`Self::finish()`].
    #[allow(clippy::too_many_arguments)]
    pub fn run<T, K>(
        &self,
        device: &Device,
        tracker: &mut ResourceTracker,
        size: UVec2,
        reads: &[&dyn Resource],
        writes: &[&dyn Resource],
        params: P,
        kernel: K,
    ) -> Result<Vec<T>>
    where
        T: Send,
        K: Fn(UVec2, &P) -> T + Sync,
    {
        for resource in reads {
            tracker.transition(*resource, ResourceState::Readable);
        }

        for resource in writes {
            tracker.transition(*resource, ResourceState::Writable);
        }

        tracker.flush(device)?;

        let label = format!("restir_{}_pass", self.label);

        measure(&label, || {
            device.dispatch(&label, size, |global_id| {
                kernel(global_id, &params)
            })
        })
    }

    /// Transitions `writes` back into [`ResourceState::Readable`]; the barriers
    /// get flushed together with the next pass.
    pub fn finish(
        &self,
        tracker: &mut ResourceTracker,
        writes: &[&dyn Resource],
    ) {
        for resource in writes {
            tracker.transition(*resource, ResourceState::Readable);
        }
    }
}
