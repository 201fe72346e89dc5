use crate::{Ray, Triangle, TriangleHit, TriangleId};

/// Scene-tracing service used by the kernels.
///
/// Implementors decide how the scene is traversed; the kernels only care about
/// the nearest hit and about occlusion between two points.
pub trait AccelerationStructure {
    /// Returns the nearest hit along given ray.
    fn trace(&self, ray: Ray) -> TriangleHit;

    /// Returns whether anything lays along given ray, up to its length.
    fn is_occluded(&self, ray: Ray) -> bool;
}

#[derive(Clone, Copy, Debug)]
pub struct TrianglesView<'a> {
    buffer: &'a [Triangle],
}

impl<'a> TrianglesView<'a> {
    pub fn new(buffer: &'a [Triangle]) -> Self {
        Self { buffer }
    }

    pub fn get(self, id: TriangleId) -> Triangle {
        self.buffer[id.get() as usize]
    }

    pub fn len(self) -> usize {
        self.buffer.len()
    }
}

/// Brute-force traversal; good enough for the small scenes the pipeline gets
/// tested with.
impl AccelerationStructure for TrianglesView<'_> {
    fn trace(&self, ray: Ray) -> TriangleHit {
        let mut hit = TriangleHit::none();

        for (triangle_id, triangle) in self.buffer.iter().enumerate() {
            if triangle.hit(ray, &mut hit) {
                hit.triangle_id = TriangleId::new(triangle_id as u32);
                hit.material_id = triangle.material_id();
            }
        }

        hit
    }

    fn is_occluded(&self, ray: Ray) -> bool {
        let mut hit = TriangleHit {
            distance: ray.len(),
            ..TriangleHit::none()
        };

        self.buffer
            .iter()
            .any(|triangle| triangle.hit(ray, &mut hit))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec3, Vec3};

    use super::*;
    use crate::MaterialId;

    fn quad(y: f32, material_id: u32) -> [Triangle; 2] {
        let a = vec3(-1.0, y, -1.0);
        let b = vec3(1.0, y, -1.0);
        let c = vec3(1.0, y, 1.0);
        let d = vec3(-1.0, y, 1.0);
        let material_id = MaterialId::new(material_id);

        [
            Triangle::new([a, b, c], [Vec3::Y; 3], [a, b, c], material_id, 0),
            Triangle::new([a, c, d], [Vec3::Y; 3], [a, c, d], material_id, 0),
        ]
    }

    #[test]
    fn trace_returns_nearest_hit() {
        let triangles: Vec<_> =
            quad(0.0, 1).into_iter().chain(quad(1.0, 2)).collect();

        let target = TrianglesView::new(&triangles);
        let hit = target.trace(Ray::new(vec3(0.1, 5.0, 0.2), Vec3::NEG_Y));

        assert!(hit.is_some());
        assert_relative_eq!(4.0, hit.distance, epsilon = 0.0001);
        assert_eq!(MaterialId::new(2), hit.material_id);

        let hit = target.trace(Ray::new(vec3(3.0, 5.0, 0.2), Vec3::NEG_Y));

        assert!(hit.is_none());
    }

    #[test]
    fn is_occluded() {
        let triangles = quad(1.0, 0);
        let target = TrianglesView::new(&triangles);
        let ray = Ray::new(vec3(0.0, 5.0, 0.0), Vec3::NEG_Y);

        assert!(target.is_occluded(ray.with_len(4.5)));
        assert!(!target.is_occluded(ray.with_len(3.5)));
    }
}
