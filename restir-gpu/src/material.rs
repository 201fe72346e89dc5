use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Material {
    /// xyz - diffuse albedo (kd)
    /// w - perceptual roughness
    pub kd_roughness: Vec4,

    /// xyz - specular albedo (ks)
    /// w - material type (as bits, see [`MaterialType`])
    pub ks_type: Vec4,

    /// xyz - emitted radiance
    /// w - unused
    pub emissive: Vec4,
}

impl Material {
    pub fn kd(&self) -> Vec3 {
        self.kd_roughness.xyz()
    }

    pub fn roughness(&self) -> f32 {
        self.kd_roughness.w
    }

    pub fn ks(&self) -> Vec3 {
        self.ks_type.xyz()
    }

    pub fn ty(&self) -> MaterialType {
        MaterialType::from_bits(self.ks_type.w.to_bits())
    }

    pub fn emissive(&self) -> Vec3 {
        self.emissive.xyz()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaterialType {
    /// Diffuse-only surface; `ks` is ignored.
    #[default]
    Matte,

    /// Diffuse surface with a GGX specular lobe on top.
    Glossy,
}

impl MaterialType {
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            1 => Self::Glossy,
            _ => Self::Matte,
        }
    }

    pub fn to_bits(self) -> u32 {
        match self {
            Self::Matte => 0,
            Self::Glossy => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}
