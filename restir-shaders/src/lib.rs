//! Per-pixel kernels of the ReSTIR pipeline.
//!
//! Each kernel is a pure function of its invocation id, its constant
//! parameters and its (read-only) bindings; it returns what the invocation
//! writes, leaving the scattering of results into resources to the caller.

pub mod generation;
pub mod resolving;
pub mod spatial_resampling;
pub mod temporal_resampling;
