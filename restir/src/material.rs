use glam::{Vec3, Vec4};

use crate::gpu;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    base_color: Vec3,
    perceptual_roughness: f32,
    specular: Vec3,
    emissive: Vec3,
    ty: gpu::MaterialType,
}

impl Material {
    pub fn with_base_color(mut self, base_color: Vec3) -> Self {
        self.base_color = base_color;
        self
    }

    pub fn with_perceptual_roughness(
        mut self,
        perceptual_roughness: f32,
    ) -> Self {
        self.perceptual_roughness = perceptual_roughness;
        self
    }

    /// Sets the specular albedo and turns the material glossy.
    pub fn with_specular(mut self, specular: Vec3) -> Self {
        self.specular = specular;
        self.ty = gpu::MaterialType::Glossy;
        self
    }

    pub fn with_emissive(mut self, emissive: Vec3) -> Self {
        self.emissive = emissive;
        self
    }

    pub(crate) fn serialize(&self) -> gpu::Material {
        gpu::Material {
            kd_roughness: self.base_color.extend(self.perceptual_roughness),
            ks_type: self
                .specular
                .extend(f32::from_bits(self.ty.to_bits())),
            emissive: self.emissive.extend(0.0),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec3::ONE,
            perceptual_roughness: 0.5,
            specular: Vec3::splat(0.04),
            emissive: Vec3::ZERO,
            ty: gpu::MaterialType::Matte,
        }
    }
}

impl From<Vec4> for Material {
    fn from(base_color: Vec4) -> Self {
        Self::default().with_base_color(base_color.truncate())
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec3, vec4};

    use super::*;

    #[test]
    fn serialize() {
        let target = Material::default()
            .with_base_color(vec3(0.1, 0.2, 0.3))
            .with_perceptual_roughness(0.25)
            .with_specular(vec3(0.5, 0.6, 0.7))
            .with_emissive(vec3(1.0, 2.0, 3.0))
            .serialize();

        assert_eq!(vec3(0.1, 0.2, 0.3), target.kd());
        assert_eq!(0.25, target.roughness());
        assert_eq!(vec3(0.5, 0.6, 0.7), target.ks());
        assert_eq!(gpu::MaterialType::Glossy, target.ty());
        assert_eq!(vec3(1.0, 2.0, 3.0), target.emissive());

        let target = Material::from(vec4(0.5, 0.5, 0.5, 1.0)).serialize();

        assert_eq!(gpu::MaterialType::Matte, target.ty());
    }
}
