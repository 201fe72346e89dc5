use std::fmt;

use log::trace;

use crate::{Device, Result};

/// State a resource is in, from the point of view of the passes.
///
/// Resources start as `Readable`; a pass moves whatever it writes into
/// `Writable` for the duration of the dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResourceState {
    #[default]
    Readable,
    Writable,
}

/// Something that lives on the device and has its state tracked.
pub trait Resource {
    fn label(&self) -> &str;

    fn state(&self) -> ResourceState;

    /// Changes the resource's state.
    ///
    /// Only [`ResourceTracker`] should call this, since it's responsible for
    /// issuing the corresponding barrier.
    fn set_state(&self, state: ResourceState);
}

/// Transition of a single resource from one state into another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Barrier {
    pub label: String,
    pub before: ResourceState,
    pub after: ResourceState,
}

impl fmt::Display for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?} -> {:?}", self.label, self.before, self.after)
    }
}

/// Collects state transitions and hands them over to the device in batches.
#[derive(Debug, Default)]
pub struct ResourceTracker {
    pending: Vec<Barrier>,
}

impl ResourceTracker {
    /// Moves `resource` into `state`, queueing a barrier if the state actually
    /// changes.
    pub fn transition(
        &mut self,
        resource: &dyn Resource,
        state: ResourceState,
    ) {
        let before = resource.state();

        if before == state {
            return;
        }

        resource.set_state(state);

        self.pending.push(Barrier {
            label: resource.label().to_owned(),
            before,
            after: state,
        });
    }

    /// Executes all queued barriers.
    pub fn flush(&mut self, device: &Device) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        trace!("Flushing {} barrier(s)", self.pending.len());

        device.barrier(&self.pending)?;
        self.pending.clear();

        Ok(())
    }

    pub fn pending(&self) -> &[Barrier] {
        &self.pending
    }

    /// Forgets about queued barriers; used when the resources they refer to
    /// are gone.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
