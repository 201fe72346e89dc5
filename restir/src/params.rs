use std::fmt::Debug;
use std::hash::Hash;

/// Handle types the application uses to refer to scene objects.
pub trait Params {
    type MeshHandle: Clone + Copy + Debug + Eq + Hash;
    type MaterialHandle: Clone + Copy + Debug + Eq + Hash;
    type InstanceHandle: Clone + Copy + Debug + Eq + Hash;
    type LightHandle: Clone + Copy + Debug + Eq + Hash;
}
