use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use glam::{uvec2, UVec2};
use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::{Barrier, Error, Result};

/// Compute device that executes the passes.
///
/// This is a host implementation of the handful of operations the pipeline
/// needs from a graphics API: allocating memory against a budget, recording
/// barriers and dispatching kernels over a pixel grid. Cloning is cheap and
/// yields a handle to the same device.
#[derive(Clone)]
pub struct Device {
    inner: Arc<DeviceInner>,
}

struct DeviceInner {
    descriptor: DeviceDescriptor,
    allocated: AtomicUsize,
    barriers: AtomicU64,
    dispatches: AtomicU64,
    is_lost: AtomicBool,
}

impl Device {
    pub fn new(descriptor: DeviceDescriptor) -> Self {
        debug!(
            "Creating device `{}`; raytracing_tier={:?}, memory_budget={}",
            descriptor.label,
            descriptor.raytracing_tier,
            descriptor.memory_budget,
        );

        Self {
            inner: Arc::new(DeviceInner {
                descriptor,
                allocated: Default::default(),
                barriers: Default::default(),
                dispatches: Default::default(),
                is_lost: Default::default(),
            }),
        }
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.inner.descriptor
    }

    pub fn label(&self) -> &str {
        &self.inner.descriptor.label
    }

    /// Returns an error if this device can't trace rays.
    pub fn ensure_raytracing(&self) -> Result<()> {
        if self.descriptor().raytracing_tier == RaytracingTier::NotSupported {
            return Err(Error::UnsupportedDevice {
                device: self.label().to_owned(),
                reason: "ray tracing is not supported".into(),
            });
        }

        Ok(())
    }

    /// Reserves `size` bytes of device memory; the memory is given back when
    /// the returned allocation gets dropped.
    pub fn allocate(
        &self,
        label: impl AsRef<str>,
        size: usize,
    ) -> Result<Allocation> {
        let label = label.as_ref();

        self.ensure_not_lost()?;

        let budget = self.inner.descriptor.memory_budget;

        self.inner
            .allocated
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |allocated| {
                allocated
                    .checked_add(size)
                    .filter(|&allocated| allocated <= budget)
            })
            .map_err(|allocated| Error::OutOfMemory {
                label: label.to_owned(),
                requested: size,
                available: budget.saturating_sub(allocated),
            })?;

        trace!("Allocated `{label}`; size={size}");

        Ok(Allocation {
            device: self.clone(),
            size,
        })
    }

    /// Executes a batch of resource barriers.
    pub fn barrier(&self, barriers: &[Barrier]) -> Result<()> {
        self.ensure_not_lost()?;

        for barrier in barriers {
            trace!("Barrier: {barrier}");
        }

        self.inner
            .barriers
            .fetch_add(barriers.len() as u64, Ordering::Relaxed);

        Ok(())
    }

    /// Invokes `kernel` once per pixel of a `size`-sized grid and returns the
    /// outputs in row-major order.
    pub fn dispatch<T, K>(
        &self,
        label: &str,
        size: UVec2,
        kernel: K,
    ) -> Result<Vec<T>>
    where
        T: Send,
        K: Fn(UVec2) -> T + Sync,
    {
        self.ensure_not_lost()?;

        trace!("Dispatching `{label}`; size={size}");

        self.inner.dispatches.fetch_add(1, Ordering::Relaxed);

        let len = size.x * size.y;
        let global_id = |idx: u32| uvec2(idx % size.x, idx / size.x);

        let outputs = if self.inner.descriptor.parallel {
            (0..len)
                .into_par_iter()
                .map(|idx| kernel(global_id(idx)))
                .collect()
        } else {
            (0..len).map(|idx| kernel(global_id(idx))).collect()
        };

        Ok(outputs)
    }

    /// Waits until all work submitted so far is finished.
    ///
    /// Dispatches are synchronous, so this only checks whether the device is
    /// still alive.
    pub fn wait_idle(&self) -> Result<()> {
        self.ensure_not_lost()
    }

    /// Marks the device as lost; all further operations fail with
    /// [`Error::DeviceLost`] until the application creates a new device.
    pub fn lose(&self) {
        warn!("Device `{}` lost", self.label());

        self.inner.is_lost.store(true, Ordering::SeqCst);
    }

    pub fn is_lost(&self) -> bool {
        self.inner.is_lost.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> DeviceStats {
        DeviceStats {
            allocated: self.inner.allocated.load(Ordering::SeqCst),
            barriers: self.inner.barriers.load(Ordering::Relaxed),
            dispatches: self.inner.dispatches.load(Ordering::Relaxed),
        }
    }

    /// Returns [`Error::DeviceLost`] if the device got lost.
    pub fn ensure_not_lost(&self) -> Result<()> {
        if self.is_lost() {
            Err(Error::DeviceLost)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("label", &self.label())
            .field("stats", &self.stats())
            .field("is_lost", &self.is_lost())
            .finish()
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

#[derive(Clone, Debug)]
pub struct DeviceDescriptor {
    pub label: String,
    pub raytracing_tier: RaytracingTier,

    /// How many bytes of resources can be allocated at once.
    pub memory_budget: usize,

    /// Largest supported texture width / height.
    pub max_texture_dimension: u32,

    /// Whether dispatches should be spread across threads.
    pub parallel: bool,
}

impl Default for DeviceDescriptor {
    fn default() -> Self {
        Self {
            label: "restir".into(),
            raytracing_tier: RaytracingTier::Tier1_1,
            memory_budget: 1024 * 1024 * 1024,
            max_texture_dimension: 16384,
            parallel: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum RaytracingTier {
    NotSupported,
    Tier1_0,
    #[default]
    Tier1_1,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Number of bytes currently allocated.
    pub allocated: usize,

    /// Number of barriers executed so far.
    pub barriers: u64,

    /// Number of dispatches executed so far.
    pub dispatches: u64,
}

/// Chunk of device memory, returned to the device on drop.
pub struct Allocation {
    device: Device,
    size: usize,
}

impl Allocation {
    pub fn size(&self) -> usize {
        self.size
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("size", &self.size)
            .finish()
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        self.device
            .inner
            .allocated
            .fetch_sub(self.size, Ordering::SeqCst);
    }
}
