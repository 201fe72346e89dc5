use crate::{Material, MaterialId};

#[derive(Clone, Copy, Debug)]
pub struct MaterialsView<'a> {
    buffer: &'a [Material],
}

impl<'a> MaterialsView<'a> {
    pub fn new(buffer: &'a [Material]) -> Self {
        Self { buffer }
    }

    /// Returns material with given id, falling back to the default material
    /// for ids not present in the buffer.
    pub fn get(self, id: MaterialId) -> Material {
        self.buffer
            .get(id.get() as usize)
            .copied()
            .unwrap_or_default()
    }
}
