use derivative::Derivative;
use fxhash::FxHashMap;

use crate::{Instance, Mesh, Params};

#[derive(Debug, Derivative)]
#[derivative(Default(bound = ""))]
pub struct Meshes<P>
where
    P: Params,
{
    meshes: FxHashMap<P::MeshHandle, Mesh>,
}

impl<P> Meshes<P>
where
    P: Params,
{
    pub fn insert(&mut self, mesh_handle: P::MeshHandle, mesh: Mesh) {
        self.meshes.insert(mesh_handle, mesh);
    }

    pub fn remove(&mut self, mesh_handle: &P::MeshHandle) {
        self.meshes.remove(mesh_handle);
    }

    /// Returns the mesh rendered by given instance together with the mesh
    /// that provides its previous-frame positions.
    ///
    /// Returns `None` when the current mesh is not loaded; when only the
    /// previous level of detail is missing, the current mesh stands in for
    /// it (so the instance has no motion from the level change).
    pub fn get_lods(
        &self,
        instance: &Instance<P>,
        prev_lod: usize,
    ) -> Option<(&Mesh, &Mesh)> {
        let mesh = self.meshes.get(&instance.mesh_handle())?;

        let prev_mesh = instance
            .lod_mesh_handle(prev_lod)
            .and_then(|mesh_handle| self.meshes.get(&mesh_handle))
            .unwrap_or(mesh);

        Some((mesh, prev_mesh))
    }
}

#[cfg(test)]
mod tests {
    use glam::Affine3A;

    use super::*;

    #[derive(Debug)]
    struct TestParams;

    impl Params for TestParams {
        type MeshHandle = u32;
        type MaterialHandle = u32;
        type InstanceHandle = u32;
        type LightHandle = u32;
    }

    fn instance(lod: usize) -> Instance<TestParams> {
        Instance::new(0, 0, Affine3A::IDENTITY)
            .with_lods([0, 1])
            .with_lod(lod)
    }

    fn triangle_count(mesh: &Mesh) -> usize {
        mesh.triangles().len()
    }

    #[test]
    fn get_lods() {
        let mut target = Meshes::<TestParams>::default();

        target.insert(0, Mesh::cube(1.0));
        target.insert(1, Mesh::quad(1.0, 1.0));

        let (curr, prev) = target.get_lods(&instance(1), 0).unwrap();

        assert_eq!(2, triangle_count(curr));
        assert_eq!(12, triangle_count(prev));

        // Previous level is not loaded anymore
        target.remove(&0);

        let (curr, prev) = target.get_lods(&instance(1), 0).unwrap();

        assert_eq!(2, triangle_count(curr));
        assert_eq!(2, triangle_count(prev));

        // Current level is not loaded anymore
        assert!(target.get_lods(&instance(0), 1).is_none());
    }
}
