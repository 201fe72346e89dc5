use derivative::Derivative;
use glam::Affine3A;

use crate::Params;

/// Mesh placed in the world, possibly in a few levels of detail.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct Instance<P>
where
    P: Params,
{
    pub(crate) lods: Vec<P::MeshHandle>,
    pub(crate) lod: usize,
    pub(crate) material_handle: P::MaterialHandle,
    pub(crate) xform: Affine3A,
    pub(crate) xform_inv: Affine3A,
}

impl<P> Instance<P>
where
    P: Params,
{
    pub fn new(
        mesh_handle: P::MeshHandle,
        material_handle: P::MaterialHandle,
        xform: Affine3A,
    ) -> Self {
        Self {
            lods: vec![mesh_handle],
            lod: 0,
            material_handle,
            xform,
            xform_inv: xform.inverse(),
        }
    }

    /// Replaces the meshes, from the most detailed one to the least detailed
    /// one.
    ///
    /// Has no effect when given an empty list.
    pub fn with_lods(
        mut self,
        lods: impl IntoIterator<Item = P::MeshHandle>,
    ) -> Self {
        let lods: Vec<_> = lods.into_iter().collect();

        if !lods.is_empty() {
            self.lod = self.lod.min(lods.len() - 1);
            self.lods = lods;
        }

        self
    }

    /// Selects which mesh gets rendered; clamped to the available levels.
    pub fn with_lod(mut self, lod: usize) -> Self {
        self.lod = lod.min(self.lods.len() - 1);
        self
    }

    pub fn with_xform(mut self, xform: Affine3A) -> Self {
        self.xform = xform;
        self.xform_inv = xform.inverse();
        self
    }

    pub fn lod(&self) -> usize {
        self.lod
    }

    pub fn xform(&self) -> Affine3A {
        self.xform
    }

    pub(crate) fn mesh_handle(&self) -> P::MeshHandle {
        self.lods[self.lod]
    }

    pub(crate) fn lod_mesh_handle(
        &self,
        lod: usize,
    ) -> Option<P::MeshHandle> {
        self.lods.get(lod).copied()
    }

    pub(crate) fn lod_count(&self) -> usize {
        self.lods.len()
    }
}

/// Describes how an instance's level of detail changed since the previous
/// frame, i.e. which mesh provides the previous positions of its vertices.
///
/// Levels can only change by one step per frame; larger jumps are treated as
/// [`LodTransition::Same`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LodTransition {
    /// Previous frame used a more detailed mesh (`lod - 1`).
    FromLower,

    /// Previous frame used the same mesh.
    Same,

    /// Previous frame used a less detailed mesh (`lod + 1`).
    FromHigher,
}

impl LodTransition {
    pub fn new(prev_lod: usize, lod: usize) -> Self {
        if prev_lod + 1 == lod {
            Self::FromLower
        } else if lod + 1 == prev_lod {
            Self::FromHigher
        } else {
            Self::Same
        }
    }

    /// Returns the level of detail the previous frame used; falls back to
    /// `lod` when that level is not among `lod_count` available ones.
    pub fn prev_lod(self, lod: usize, lod_count: usize) -> usize {
        let prev_lod = match self {
            Self::FromLower => lod.checked_sub(1),
            Self::Same => Some(lod),
            Self::FromHigher => Some(lod + 1),
        };

        prev_lod.filter(|&prev_lod| prev_lod < lod_count).unwrap_or(lod)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lod_transition() {
        assert_eq!(LodTransition::FromLower, LodTransition::new(0, 1));
        assert_eq!(LodTransition::Same, LodTransition::new(1, 1));
        assert_eq!(LodTransition::FromHigher, LodTransition::new(2, 1));

        // Jumps
        assert_eq!(LodTransition::Same, LodTransition::new(0, 2));
        assert_eq!(LodTransition::Same, LodTransition::new(3, 1));
    }

    #[test]
    fn prev_lod() {
        assert_eq!(0, LodTransition::FromLower.prev_lod(1, 3));
        assert_eq!(1, LodTransition::Same.prev_lod(1, 3));
        assert_eq!(2, LodTransition::FromHigher.prev_lod(1, 3));

        // Ends of the chain
        assert_eq!(0, LodTransition::FromLower.prev_lod(0, 3));
        assert_eq!(2, LodTransition::FromHigher.prev_lod(2, 3));
    }
}
