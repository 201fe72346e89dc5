use glam::{Vec2, Vec3};

use crate::{GBufferEntry, MaterialId, TriangleId};

/// Surface point being shaded, reconstructed from the g-buffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hit {
    pub origin: Vec3,
    pub dir: Vec3,
    pub point: Vec3,
    pub gbuffer: GBufferEntry,
}

impl Hit {
    /// How far to move a hit point away from its surface to avoid
    /// self-intersection when casting shadow rays
    pub const NUDGE_OFFSET: f32 = 0.001;

    pub fn new(origin: Vec3, gbuffer: GBufferEntry) -> Self {
        Self {
            origin,
            dir: (gbuffer.position - origin).normalize_or_zero(),
            point: gbuffer.position + gbuffer.normal * Self::NUDGE_OFFSET,
            gbuffer,
        }
    }

    pub fn is_some(&self) -> bool {
        self.gbuffer.is_some()
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    pub distance: f32,
    pub point: Vec3,
    pub bary: Vec2,
    pub triangle_id: TriangleId,
    pub material_id: MaterialId,
}

impl TriangleHit {
    pub fn none() -> Self {
        Self {
            distance: f32::MAX,
            point: Default::default(),
            bary: Default::default(),
            triangle_id: TriangleId::new(0),
            material_id: MaterialId::new(0),
        }
    }

    pub fn is_some(&self) -> bool {
        self.distance < f32::MAX
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }
}
