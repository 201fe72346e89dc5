use std::collections::hash_map::Entry;

use derivative::Derivative;
use fxhash::FxHashMap;
use glam::Affine3A;

use crate::{gpu, Instance, LodTransition, Materials, Meshes, Params};

#[derive(Debug, Derivative)]
#[derivative(Default(bound = ""))]
pub struct Instances<P>
where
    P: Params,
{
    instances: FxHashMap<P::InstanceHandle, InstanceEntry<P>>,
}

impl<P> Instances<P>
where
    P: Params,
{
    /// Adds or updates an instance.
    ///
    /// Updating an instance doesn't touch its previous transform and level of
    /// detail; those move forward only in [`Self::commit()`], once per frame.
    pub fn add(
        &mut self,
        instance_handle: P::InstanceHandle,
        instance: Instance<P>,
    ) {
        match self.instances.entry(instance_handle) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().instance = instance;
            }

            Entry::Vacant(entry) => {
                entry.insert(InstanceEntry {
                    prev_xform: instance.xform,
                    prev_lod: instance.lod,
                    instance,
                });
            }
        }
    }

    pub fn get(
        &self,
        instance_handle: &P::InstanceHandle,
    ) -> Option<&Instance<P>> {
        self.instances
            .get(instance_handle)
            .map(|entry| &entry.instance)
    }

    pub fn remove(
        &mut self,
        instance_handle: &P::InstanceHandle,
    ) -> Option<Instance<P>> {
        self.instances
            .remove(instance_handle)
            .map(|entry| entry.instance)
    }

    /// Builds world-space triangles of all instances.
    ///
    /// Instances whose mesh or material is not available are skipped; they
    /// might be still loading in the background, in which case they'll show
    /// up once they're ready.
    pub fn build(
        &self,
        meshes: &Meshes<P>,
        materials: &Materials<P>,
    ) -> Vec<gpu::Triangle> {
        let mut triangles = Vec::new();

        for (instance_id, entry) in self.instances.values().enumerate() {
            let instance = &entry.instance;

            let prev_lod = LodTransition::new(entry.prev_lod, instance.lod)
                .prev_lod(instance.lod, instance.lod_count());

            let Some((mesh, prev_mesh)) = meshes.get_lods(instance, prev_lod)
            else {
                continue;
            };

            let Some(material_id) =
                materials.lookup(&instance.material_handle)
            else {
                continue;
            };

            for (triangle_idx, triangle) in mesh.triangles().iter().enumerate()
            {
                let prev_triangle = prev_mesh
                    .triangles()
                    .get(triangle_idx)
                    .unwrap_or(triangle);

                triangles.push(gpu::Triangle::new(
                    triangle.build_positions(instance.xform),
                    triangle.build_normals(instance.xform_inv),
                    prev_triangle.build_positions(entry.prev_xform),
                    material_id,
                    instance_id as u32,
                ));
            }
        }

        triangles
    }

    /// Remembers the current transforms and levels of detail as the previous
    /// ones; called at the end of each frame.
    pub fn commit(&mut self) {
        for entry in self.instances.values_mut() {
            entry.prev_xform = entry.instance.xform;
            entry.prev_lod = entry.instance.lod;
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct InstanceEntry<P>
where
    P: Params,
{
    pub instance: Instance<P>,
    pub prev_xform: Affine3A,
    pub prev_lod: usize,
}
