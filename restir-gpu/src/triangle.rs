use bytemuck::{Pod, Zeroable};
use glam::{uvec4, UVec4, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{MaterialId, Ray, TriangleHit};

/// World-space triangle, as seen by the kernels.
///
/// Alongside the current vertices, each triangle carries its vertices from the
/// previous frame - that's what motion vectors get reconstructed from.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub positions: [Vec4; 3],
    pub normals: [Vec4; 3],
    pub prev_positions: [Vec4; 3],

    /// x - material id
    /// y - instance id
    pub ids: UVec4,
}

impl Triangle {
    pub fn new(
        positions: [Vec3; 3],
        normals: [Vec3; 3],
        prev_positions: [Vec3; 3],
        material_id: MaterialId,
        instance_id: u32,
    ) -> Self {
        Self {
            positions: positions.map(|p| p.extend(0.0)),
            normals: normals.map(|n| n.extend(0.0)),
            prev_positions: prev_positions.map(|p| p.extend(0.0)),
            ids: uvec4(material_id.get(), instance_id, 0, 0),
        }
    }

    pub fn position(&self, idx: usize) -> Vec3 {
        self.positions[idx].xyz()
    }

    pub fn prev_position(&self, idx: usize) -> Vec3 {
        self.prev_positions[idx].xyz()
    }

    pub fn normal(&self, idx: usize) -> Vec3 {
        self.normals[idx].xyz()
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.ids.x)
    }

    pub fn instance_id(&self) -> u32 {
        self.ids.y
    }

    pub fn face_normal(&self) -> Vec3 {
        let v0v1 = self.position(1) - self.position(0);
        let v0v2 = self.position(2) - self.position(0);

        v0v1.cross(v0v2).normalize_or_zero()
    }

    /// Interpolates the current-frame position at given barycentrics.
    pub fn point(&self, bary: Vec2) -> Vec3 {
        Self::interpolate(
            [self.position(0), self.position(1), self.position(2)],
            bary,
        )
    }

    /// Interpolates the previous-frame position at given barycentrics.
    pub fn prev_point(&self, bary: Vec2) -> Vec3 {
        Self::interpolate(
            [
                self.prev_position(0),
                self.prev_position(1),
                self.prev_position(2),
            ],
            bary,
        )
    }

    pub fn shading_normal(&self, bary: Vec2) -> Vec3 {
        let normals = [self.normal(0), self.normal(1), self.normal(2)];

        Self::interpolate(normals, bary).normalize_or_zero()
    }

    fn interpolate([v0, v1, v2]: [Vec3; 3], bary: Vec2) -> Vec3 {
        v0 * (1.0 - bary.x - bary.y) + v1 * bary.x + v2 * bary.y
    }

    /// Intersects this triangle using the Möller-Trumbore algorithm; when the
    /// intersection is closer than `hit`, updates `hit` and returns `true`.
    pub fn hit(&self, ray: Ray, hit: &mut TriangleHit) -> bool {
        let v0v1 = self.position(1) - self.position(0);
        let v0v2 = self.position(2) - self.position(0);

        // ---

        let pvec = ray.dir().cross(v0v2);
        let det = v0v1.dot(pvec);

        if det.abs() < f32::EPSILON {
            return false;
        }

        // ---

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.position(0);
        let u = tvec.dot(pvec) * inv_det;
        let qvec = tvec.cross(v0v1);
        let v = ray.dir().dot(qvec) * inv_det;
        let distance = v0v2.dot(qvec) * inv_det;

        if (u < 0.0)
            | (u > 1.0)
            | (v < 0.0)
            | (u + v > 1.0)
            | (distance <= 0.0)
            | (distance >= hit.distance)
        {
            return false;
        }

        hit.distance = distance;
        hit.point = ray.at(distance);
        hit.bary = Vec2::new(u, v);

        true
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangleId(u32);

impl TriangleId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn target() -> Triangle {
        Triangle::new(
            [
                vec3(-1.0, 0.0, -1.0),
                vec3(1.0, 0.0, -1.0),
                vec3(0.0, 0.0, 1.0),
            ],
            [Vec3::Y; 3],
            [
                vec3(-1.0, -1.0, -1.0),
                vec3(1.0, -1.0, -1.0),
                vec3(0.0, -1.0, 1.0),
            ],
            MaterialId::new(7),
            3,
        )
    }

    #[test]
    fn hit() {
        let target = target();
        let mut hit = TriangleHit::none();

        let ray = Ray::new(vec3(0.0, 2.0, 0.0), Vec3::NEG_Y);

        assert!(target.hit(ray, &mut hit));
        assert_relative_eq!(2.0, hit.distance);
        assert_relative_eq!(0.0, hit.point.y);

        let point = target.point(hit.bary);

        assert_relative_eq!(hit.point.x, point.x, epsilon = 0.0001);
        assert_relative_eq!(hit.point.z, point.z, epsilon = 0.0001);

        let prev_point = target.prev_point(hit.bary);

        assert_relative_eq!(-1.0, prev_point.y, epsilon = 0.0001);
    }

    #[test]
    fn miss() {
        let target = target();
        let mut hit = TriangleHit::none();

        // Pointing away
        let ray = Ray::new(vec3(0.0, 2.0, 0.0), Vec3::Y);

        assert!(!target.hit(ray, &mut hit));

        // Outside of the triangle
        let ray = Ray::new(vec3(5.0, 2.0, 0.0), Vec3::NEG_Y);

        assert!(!target.hit(ray, &mut hit));

        // Farther than an already-found hit
        let mut hit = TriangleHit {
            distance: 1.0,
            ..TriangleHit::none()
        };

        let ray = Ray::new(vec3(0.0, 2.0, 0.0), Vec3::NEG_Y);

        assert!(!target.hit(ray, &mut hit));
    }

    #[test]
    fn ids() {
        let target = target();

        assert_eq!(MaterialId::new(7), target.material_id());
        assert_eq!(3, target.instance_id());
        assert_relative_eq!(1.0, target.face_normal().y.abs());
    }
}
