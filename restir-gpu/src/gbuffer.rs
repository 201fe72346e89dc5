use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{MaterialId, MaterialType, Normal, Surface};

/// Per-pixel surface description produced by the generation pass.
///
/// A zero depth means the primary ray didn't hit anything.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GBufferEntry {
    pub position: Vec3,
    pub depth: f32,
    pub normal: Vec3,

    /// How much `depth` changes when moving one pixel right (x) or down (y).
    pub depth_derivatives: Vec2,

    pub kd: Vec3,
    pub roughness: f32,
    pub ks: Vec3,
    pub material_type: MaterialType,
    pub material_id: MaterialId,
}

impl GBufferEntry {
    pub fn pack(self) -> [Vec4; 4] {
        let d0 = self.position.extend(self.depth);

        let d1 = Normal::encode(self.normal)
            .extend(self.depth_derivatives.x)
            .extend(self.depth_derivatives.y);

        let d2 = self.kd.extend(self.roughness);

        let d3 = self.ks.extend(f32::from_bits(
            (self.material_id.get() << 8) | self.material_type.to_bits(),
        ));

        [d0, d1, d2, d3]
    }

    pub fn unpack([d0, d1, d2, d3]: [Vec4; 4]) -> Self {
        if d0.w <= 0.0 {
            return Self::default();
        }

        let d3w = d3.w.to_bits();

        Self {
            position: d0.xyz(),
            depth: d0.w,
            normal: Normal::decode(d1.xy()),
            depth_derivatives: d1.zw(),
            kd: d2.xyz(),
            roughness: d2.w,
            ks: d3.xyz(),
            material_type: MaterialType::from_bits(d3w & 0xff),
            material_id: MaterialId::new(d3w >> 8),
        }
    }

    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    pub fn surface(&self) -> Surface {
        Surface {
            normal: self.normal,
            depth: self.depth,
            depth_derivatives: self.depth_derivatives,
        }
    }

    pub fn clamped_roughness(&self) -> f32 {
        self.roughness.clamp(0.089, 1.0)
    }
}

/// Read-only access to the four g-buffer channels.
#[derive(Clone, Copy, Debug)]
pub struct GBufferView<'a> {
    d0: &'a [Vec4],
    d1: &'a [Vec4],
    d2: &'a [Vec4],
    d3: &'a [Vec4],
}

impl<'a> GBufferView<'a> {
    pub fn new([d0, d1, d2, d3]: [&'a [Vec4]; 4]) -> Self {
        Self { d0, d1, d2, d3 }
    }

    pub fn get(self, idx: usize) -> GBufferEntry {
        GBufferEntry::unpack([
            self.d0[idx],
            self.d1[idx],
            self.d2[idx],
            self.d3[idx],
        ])
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec2, vec3};

    use super::*;

    const EPSILON: f32 = 0.001;

    #[test]
    fn serialization() {
        let target = GBufferEntry {
            position: vec3(1.0, -2.0, 3.5),
            depth: 4.25,
            normal: vec3(0.2, 0.9, -0.3).normalize(),
            depth_derivatives: vec2(0.05, -0.125),
            kd: vec3(0.1, 0.2, 0.3),
            roughness: 0.4,
            ks: vec3(0.5, 0.6, 0.7),
            material_type: MaterialType::Glossy,
            material_id: MaterialId::new(1234),
        };

        let actual = GBufferEntry::unpack(target.pack());

        assert_eq!(target.position, actual.position);
        assert_eq!(target.depth, actual.depth);

        for (expected, actual) in target
            .normal
            .to_array()
            .into_iter()
            .zip(actual.normal.to_array())
        {
            assert_relative_eq!(expected, actual, epsilon = EPSILON);
        }

        assert_eq!(target.depth_derivatives, actual.depth_derivatives);
        assert_eq!(target.kd, actual.kd);
        assert_eq!(target.roughness, actual.roughness);
        assert_eq!(target.ks, actual.ks);
        assert_eq!(target.material_type, actual.material_type);
        assert_eq!(target.material_id, actual.material_id);
    }

    #[test]
    fn miss() {
        let target = GBufferEntry::unpack([Vec4::ZERO; 4]);

        assert!(target.is_none());
    }
}
