//! Common structs, algorithms etc. shared by the ReSTIR kernels and the
//! renderer driving them.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod brdf;
mod camera;
mod frame;
mod gbuffer;
mod hit;
mod light;
mod lights;
mod material;
mod materials;
mod noise;
mod normal;
mod passes;
mod ray;
mod reprojection;
mod reservoir;
mod surface;
mod triangle;
mod triangles;
mod utils;

pub use self::brdf::*;
pub use self::camera::*;
pub use self::frame::*;
pub use self::gbuffer::*;
pub use self::hit::*;
pub use self::light::*;
pub use self::lights::*;
pub use self::material::*;
pub use self::materials::*;
pub use self::noise::*;
pub use self::normal::*;
pub use self::passes::*;
pub use self::ray::*;
pub use self::reprojection::*;
pub use self::reservoir::*;
pub use self::surface::*;
pub use self::triangle::*;
pub use self::triangles::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;

    pub use crate::*;
}

/// Smallest value considered non-zero when dividing by pdfs, cosines etc.
pub const RESTIR_EPSILON: f32 = 0.00001;
