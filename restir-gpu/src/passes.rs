//! Constant-parameter blocks handed to each pass.

use bytemuck::{Pod, Zeroable};

use crate::{Frame, LightSampling};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GenerationPassParams {
    pub seed: u32,
    pub frame: Frame,

    /// Number of candidates each pixel streams through its reservoir.
    pub candidate_count: u32,

    /// See: [`LightSampling`].
    pub light_sampling: u32,
}

impl GenerationPassParams {
    pub fn light_sampling(&self) -> LightSampling {
        LightSampling::from_bits(self.light_sampling)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TemporalResamplingPassParams {
    pub seed: u32,
    pub frame: Frame,
    pub max_history: f32,

    /// Minimum cosine between current and previous normal.
    pub normal_threshold: f32,

    /// Maximum relative difference between expected and previous depth.
    pub depth_threshold: f32,

    pub _padding: [u32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpatialResamplingPassParams {
    pub seed: u32,
    pub sample_count: u32,
    pub max_history: f32,

    /// Search radius, in pixels.
    pub radius: f32,

    /// Lower bound on the search radius after it got adapted to the surface.
    pub min_radius: f32,

    pub normal_threshold: f32,
    pub depth_threshold: f32,
    pub _padding: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ResolvingPassParams {
    /// See: [`ResolvingMode`].
    pub mode: u32,

    /// Whether to re-check visibility of the final sample; when disabled, the
    /// visibility found during generation is trusted.
    pub shadow_rays: u32,

    pub max_history: f32,
    pub ambient: f32,

    /// xyz - background color
    /// w - unused
    pub background: [f32; 4],
}

impl ResolvingPassParams {
    pub fn mode(&self) -> ResolvingMode {
        ResolvingMode::from_bits(self.mode)
    }

    pub fn shadow_rays(&self) -> bool {
        self.shadow_rays != 0
    }
}

/// What the resolving pass writes into the color buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolvingMode {
    #[default]
    Image,
    DirectLightingOnly,
    BaseAlbedo,
    Normals,

    /// Number of candidates behind each pixel's reservoir, relative to the
    /// history cap.
    Reservoirs,
}

impl ResolvingMode {
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            1 => Self::DirectLightingOnly,
            2 => Self::BaseAlbedo,
            3 => Self::Normals,
            4 => Self::Reservoirs,
            _ => Self::Image,
        }
    }

    pub fn to_bits(self) -> u32 {
        match self {
            Self::Image => 0,
            Self::DirectLightingOnly => 1,
            Self::BaseAlbedo => 2,
            Self::Normals => 3,
            Self::Reservoirs => 4,
        }
    }
}
