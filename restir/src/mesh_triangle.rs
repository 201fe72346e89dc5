use glam::{Affine3A, Mat4, Vec3};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshTriangle {
    positions: [Vec3; 3],
    normals: [Vec3; 3],
}

impl MeshTriangle {
    pub fn with_positions(mut self, positions: [impl Into<Vec3>; 3]) -> Self {
        self.positions = positions.map(Into::into);
        self
    }

    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = normals;
        self
    }

    pub fn positions(&self) -> [Vec3; 3] {
        self.positions
    }

    pub fn normals(&self) -> [Vec3; 3] {
        self.normals
    }

    /// Returns world-space positions of this triangle's vertices.
    pub(crate) fn build_positions(&self, xform: Affine3A) -> [Vec3; 3] {
        self.positions.map(|vertex| xform.transform_point3(vertex))
    }

    /// Returns world-space normals of this triangle's vertices.
    pub(crate) fn build_normals(&self, xform_inv: Affine3A) -> [Vec3; 3] {
        // Transforming normals requires inversing and transposing the matrix in
        // order to get correct results under non-uniform scaling, see:
        //
        // https://paroj.github.io/gltut/Illumination/Tut09%20Normal%20Transformation.html
        let mat = Mat4::from(xform_inv).transpose();

        self.normals
            .map(|normal| mat.transform_vector3(normal).normalize_or_zero())
    }
}
