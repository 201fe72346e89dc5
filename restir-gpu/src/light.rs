use bytemuck::{Pod, Zeroable};
use glam::{vec4, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::Vec3Ext;

/// One-sided rectangular area light.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct AreaLight {
    /// xyz - position (center of the rectangle)
    /// w - intensity
    pub d0: Vec4,

    /// xyz - normal (direction the light emits towards)
    /// w - width
    pub d1: Vec4,

    /// xyz - color
    /// w - height
    pub d2: Vec4,

    /// x - probability of picking this light (see [`LightSampling::Power`])
    /// y - cumulative probability of picking this light or any light before it
    /// z - area
    /// w - unused
    pub d3: Vec4,
}

impl AreaLight {
    pub fn new(
        position: Vec3,
        normal: Vec3,
        color: Vec3,
        intensity: f32,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            d0: position.extend(intensity),
            d1: normal.normalize_or_zero().extend(width),
            d2: color.extend(height),
            d3: vec4(0.0, 0.0, width * height, 0.0),
        }
    }

    pub fn with_pick(mut self, pdf: f32, cdf: f32) -> Self {
        self.d3.x = pdf;
        self.d3.y = cdf;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn intensity(&self) -> f32 {
        self.d0.w
    }

    pub fn normal(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn width(&self) -> f32 {
        self.d1.w
    }

    pub fn color(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn height(&self) -> f32 {
        self.d2.w
    }

    pub fn pick_pdf(&self) -> f32 {
        self.d3.x
    }

    pub fn pick_cdf(&self) -> f32 {
        self.d3.y
    }

    pub fn area(&self) -> f32 {
        self.d3.z
    }

    pub fn is_none(&self) -> bool {
        self.area() <= 0.0
    }

    /// Radiance emitted from each point of the light's front face.
    pub fn radiance(&self) -> Vec3 {
        self.color() * self.intensity()
    }

    /// Total emitted power, up to a constant factor; used to importance-sample
    /// lights.
    pub fn power(&self) -> f32 {
        self.radiance().luma() * self.area()
    }

    /// Returns the light's tangent and bitangent, spanning its rectangle.
    pub fn basis(&self) -> (Vec3, Vec3) {
        self.normal().any_orthonormal_pair()
    }

    /// Maps a uniform sample from `<0.0, 1.0)²` into a point on the light.
    pub fn sample_point(&self, uv: Vec2) -> Vec3 {
        let (t, b) = self.basis();

        self.position()
            + t * (uv.x - 0.5) * self.width()
            + b * (uv.y - 0.5) * self.height()
    }

    /// Returns whether given point lays on this light; used to check whether
    /// reused samples are still valid after lights got updated.
    pub fn contains(&self, point: Vec3) -> bool {
        const TOLERANCE: f32 = 0.001;

        if self.is_none() {
            return false;
        }

        let (t, b) = self.basis();
        let local = point - self.position();

        local.dot(self.normal()).abs() <= TOLERANCE
            && local.dot(t).abs() <= 0.5 * self.width() + TOLERANCE
            && local.dot(b).abs() <= 0.5 * self.height() + TOLERANCE
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightId(u32);

impl LightId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Strategy of picking a light for a candidate sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightSampling {
    Uniform,

    /// Picks lights proportionally to their emitted power.
    #[default]
    Power,
}

impl LightSampling {
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            0 => Self::Uniform,
            _ => Self::Power,
        }
    }

    pub fn to_bits(self) -> u32 {
        match self {
            Self::Uniform => 0,
            Self::Power => 1,
        }
    }
}
