use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Pod, Zeroable,
)]
pub struct Frame(u32);

impl Frame {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Returns whether this is the first frame after the pipeline got
    /// (re)created, i.e. whether there's no history to reuse.
    pub fn is_cold(self) -> bool {
        self.0 == 0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
