use std::f32::consts::TAU;

use glam::{vec2, vec3, Vec2, Vec3};

use crate::gpu;

/// Rectangular, one-sided area light.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    position: Vec3,
    normal: Vec3,
    color: Vec3,
    intensity: f32,
    size: Vec2,
}

impl Light {
    /// Creates a white, 1x1 light at `position`, emitting towards `normal`.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            color: Vec3::ONE,
            intensity: 1.0,
            size: Vec2::ONE,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub(crate) fn serialize(&self) -> gpu::AreaLight {
        gpu::AreaLight::new(
            self.position,
            self.normal,
            self.color,
            self.intensity,
            self.size.x,
            self.size.y,
        )
    }
}

/// Procedural rig of lights spread over a hemisphere, all facing its center.
#[derive(Clone, Debug, PartialEq)]
pub struct HemisphereLights {
    pub center: Vec3,
    pub radius: f32,
    pub count: u32,
    pub color: Vec3,
    pub intensity: f32,
    pub size: Vec2,
}

impl HemisphereLights {
    pub fn build(&self) -> Vec<Light> {
        (0..self.count)
            .map(|i| {
                // Fibonacci hemisphere
                let phi = i as f32 * TAU / 1.618;
                let y = 1.0 - i as f32 / self.count as f32;
                let r = (1.0 - y * y).sqrt();

                let position = self.center
                    + vec3(phi.cos() * r, y, phi.sin() * r) * self.radius;

                Light::new(position, (self.center - position).normalize())
                    .with_color(self.color)
                    .with_intensity(self.intensity)
                    .with_size(self.size)
            })
            .collect()
    }
}

impl Default for HemisphereLights {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 5.0,
            count: 10,
            color: Vec3::ONE,
            intensity: 100.0,
            size: vec2(1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn hemisphere_lights() {
        let target = HemisphereLights {
            center: vec3(1.0, 2.0, 3.0),
            ..Default::default()
        };

        let lights = target.build();

        assert_eq!(10, lights.len());

        // The first light sits at the zenith
        assert_relative_eq!(7.0, lights[0].position().y, epsilon = 0.0001);
        assert_relative_eq!(-1.0, lights[0].normal().y, epsilon = 0.0001);

        for light in &lights {
            let offset = light.position() - target.center;

            assert_relative_eq!(5.0, offset.length(), epsilon = 0.001);
            assert!(offset.y > 0.0);

            // Each light faces the center
            assert_relative_eq!(
                -1.0,
                light.normal().dot(offset.normalize()),
                epsilon = 0.0001
            );
        }
    }
}
