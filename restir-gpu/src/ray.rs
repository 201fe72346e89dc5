use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ray {
    origin: Vec3,
    dir: Vec3,
    len: f32,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir,
            len: f32::MAX,
        }
    }

    /// Limits this ray's length; used for shadow rays, which only care about
    /// occluders between the origin and the light.
    pub fn with_len(mut self, len: f32) -> Self {
        self.len = len;
        self
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    pub fn len(&self) -> f32 {
        self.len
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.dir * distance
    }

    /// Returns distance at which this ray intersects given plane, if it does.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = self.dir.dot(normal);

        if denom.abs() < crate::RESTIR_EPSILON {
            return None;
        }

        let distance = (point - self.origin).dot(normal) / denom;

        if distance > 0.0 {
            Some(distance)
        } else {
            None
        }
    }
}
