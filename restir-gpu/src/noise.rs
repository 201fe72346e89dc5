use core::f32::consts::PI;

use glam::{vec2, UVec2, Vec2};

/// Per-invocation random number generator.
///
/// Each pixel gets its own stream, seeded from the pass' seed and the pixel's
/// position, so that a given `(seed, pixel)` pair always yields the same
/// sequence of samples.
#[derive(Clone, Copy, Debug)]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        Self {
            state: seed
                ^ 48619u32.wrapping_mul(id.x)
                ^ 95461u32.wrapping_mul(id.y),
        }
    }

    /// Generates a uniform sample in range `<0.0, 1.0)`.
    pub fn sample(&mut self) -> f32 {
        ((self.sample_int() >> 8) as f32) * (1.0 / 16777216.0)
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    /// Generates a uniform sample on a circle.
    pub fn sample_circle(&mut self) -> Vec2 {
        let angle = self.sample() * PI * 2.0;

        vec2(angle.cos(), angle.sin())
    }

    /// Generates a uniform sample inside of a disk.
    pub fn sample_disk(&mut self) -> Vec2 {
        let radius = self.sample().sqrt();

        self.sample_circle() * radius
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn determinism() {
        let mut a = WhiteNoise::new(1234, uvec2(5, 6));
        let mut b = WhiteNoise::new(1234, uvec2(5, 6));
        let mut c = WhiteNoise::new(1234, uvec2(6, 5));

        let a: Vec<_> = (0..16).map(|_| a.sample_int()).collect();
        let b: Vec<_> = (0..16).map(|_| b.sample_int()).collect();
        let c: Vec<_> = (0..16).map(|_| c.sample_int()).collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn range() {
        let mut noise = WhiteNoise::new(0, uvec2(0, 0));
        let mut sum = 0.0;

        for _ in 0..10_000 {
            let sample = noise.sample();

            assert!((0.0..1.0).contains(&sample));
            sum += sample;
        }

        let mean = sum / 10_000.0;

        assert!((mean - 0.5).abs() < 0.02, "mean={mean}");
    }

    #[test]
    fn disk() {
        let mut noise = WhiteNoise::new(42, uvec2(1, 1));

        for _ in 0..1_000 {
            assert!(noise.sample_disk().length() <= 1.0 + 1e-5);
        }
    }
}
