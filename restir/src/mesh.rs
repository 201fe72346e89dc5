use glam::{vec3, Vec3};

use crate::MeshTriangle;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    triangles: Vec<MeshTriangle>,
}

impl Mesh {
    pub fn new(triangles: Vec<MeshTriangle>) -> Self {
        Self { triangles }
    }

    /// Creates a `width` x `depth` rectangle laying on the XZ plane, centered
    /// at the origin and facing up.
    pub fn quad(width: f32, depth: f32) -> Self {
        let w = width * 0.5;
        let d = depth * 0.5;

        Self::new(Self::rect([
            vec3(-w, 0.0, -d),
            vec3(-w, 0.0, d),
            vec3(w, 0.0, d),
            vec3(w, 0.0, -d),
        ]))
    }

    /// Creates an axis-aligned cube of given edge length, centered at the
    /// origin.
    pub fn cube(size: f32) -> Self {
        let s = size * 0.5;

        let corner = |x: f32, y: f32, z: f32| vec3(x * s, y * s, z * s);

        let faces = [
            // +x
            [
                corner(1.0, -1.0, 1.0),
                corner(1.0, -1.0, -1.0),
                corner(1.0, 1.0, -1.0),
                corner(1.0, 1.0, 1.0),
            ],
            // -x
            [
                corner(-1.0, -1.0, -1.0),
                corner(-1.0, -1.0, 1.0),
                corner(-1.0, 1.0, 1.0),
                corner(-1.0, 1.0, -1.0),
            ],
            // +y
            [
                corner(-1.0, 1.0, -1.0),
                corner(-1.0, 1.0, 1.0),
                corner(1.0, 1.0, 1.0),
                corner(1.0, 1.0, -1.0),
            ],
            // -y
            [
                corner(-1.0, -1.0, 1.0),
                corner(-1.0, -1.0, -1.0),
                corner(1.0, -1.0, -1.0),
                corner(1.0, -1.0, 1.0),
            ],
            // +z
            [
                corner(-1.0, -1.0, 1.0),
                corner(1.0, -1.0, 1.0),
                corner(1.0, 1.0, 1.0),
                corner(-1.0, 1.0, 1.0),
            ],
            // -z
            [
                corner(1.0, -1.0, -1.0),
                corner(-1.0, -1.0, -1.0),
                corner(-1.0, 1.0, -1.0),
                corner(1.0, 1.0, -1.0),
            ],
        ];

        Self::new(faces.into_iter().flat_map(Self::rect).collect())
    }

    pub fn triangles(&self) -> &[MeshTriangle] {
        &self.triangles
    }

    /// Splits a planar, counter-clockwise quad into two triangles.
    fn rect([a, b, c, d]: [Vec3; 4]) -> Vec<MeshTriangle> {
        let normal = (b - a).cross(c - a).normalize();

        vec![
            MeshTriangle::default()
                .with_positions([a, b, c])
                .with_normals([normal; 3]),
            MeshTriangle::default()
                .with_positions([a, c, d])
                .with_normals([normal; 3]),
        ]
    }
}
