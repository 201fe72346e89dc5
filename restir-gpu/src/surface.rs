use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::Normal;

/// Geometric part of a g-buffer entry; what the history keeps for validating
/// reprojections.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Surface {
    pub normal: Vec3,
    pub depth: f32,
    pub depth_derivatives: Vec2,
}

impl Surface {
    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    /// Returns whether `other`, observed at `expected_depth`, lays on the same
    /// surface as `self`.
    ///
    /// Normals have to be at most `normal_threshold` (a cosine) apart, while
    /// depths have to agree up to `depth_threshold` (a fraction of the
    /// expected depth).
    pub fn matches(
        &self,
        other: &Self,
        expected_depth: f32,
        normal_threshold: f32,
        depth_threshold: f32,
    ) -> bool {
        if !self.is_some() || !other.is_some() {
            return false;
        }

        if self.normal.dot(other.normal) < normal_threshold {
            return false;
        }

        (other.depth - expected_depth).abs() <= depth_threshold * expected_depth
    }

    /// Returns the depth this surface is expected to have at given
    /// screen-space offset, extrapolated from the partial depth derivatives.
    pub fn depth_at(&self, offset: Vec2) -> f32 {
        self.depth + self.depth_derivatives.dot(offset)
    }
}

/// Read-only access to the history's surfaces, i.e. the first two channels of
/// previous frame's g-buffer.
#[derive(Clone, Copy, Debug)]
pub struct SurfacesView<'a> {
    d0: &'a [Vec4],
    d1: &'a [Vec4],
}

impl<'a> SurfacesView<'a> {
    pub fn new([d0, d1]: [&'a [Vec4]; 2]) -> Self {
        Self { d0, d1 }
    }

    pub fn get(self, idx: usize) -> Surface {
        let d0 = self.d0[idx];
        let d1 = self.d1[idx];

        if d0.w <= 0.0 {
            return Surface::default();
        }

        Surface {
            normal: Normal::decode(d1.xy()),
            depth: d0.w,
            depth_derivatives: d1.zw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    fn surface(normal: Vec3, depth: f32) -> Surface {
        Surface {
            normal,
            depth,
            depth_derivatives: Vec2::ZERO,
        }
    }

    #[test]
    fn matches() {
        let lhs = surface(Vec3::Y, 10.0);

        assert!(lhs.matches(&surface(Vec3::Y, 10.0), 10.0, 0.9, 0.1));
        assert!(lhs.matches(&surface(Vec3::Y, 10.5), 10.0, 0.9, 0.1));

        // Depth diverges
        assert!(!lhs.matches(&surface(Vec3::Y, 12.0), 10.0, 0.9, 0.1));

        // Normal diverges
        assert!(!lhs.matches(&surface(Vec3::X, 10.0), 10.0, 0.9, 0.1));

        // No surface
        assert!(!lhs.matches(&Surface::default(), 10.0, 0.9, 0.1));
    }

    #[test]
    fn depth_at() {
        let target = Surface {
            normal: Vec3::Y,
            depth: 10.0,
            depth_derivatives: vec2(0.5, -0.25),
        };

        assert_eq!(11.5, target.depth_at(vec2(2.0, -2.0)));
    }
}
