use glam::Vec3;

use crate::{gpu, Error, Result};

/// Knobs of the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of light candidates generated for each pixel.
    pub candidate_count: u32,

    /// Strategy of picking lights for the candidates.
    pub light_sampling: gpu::LightSampling,

    /// Whether reservoirs should be reused across frames.
    pub temporal: bool,

    /// Whether reservoirs should be reused across neighbouring pixels.
    pub spatial: bool,

    /// Maximum number of candidates a reservoir can represent; bounds how long
    /// the history lasts.
    pub max_history: f32,

    pub temporal_normal_threshold: f32,
    pub temporal_depth_threshold: f32,

    pub spatial_sample_count: u32,
    pub spatial_radius: f32,
    pub spatial_min_radius: f32,
    pub spatial_normal_threshold: f32,
    pub spatial_depth_threshold: f32,

    /// Whether the resolving pass should re-check visibility of the final
    /// samples.
    pub shadow_rays: bool,

    pub ambient: f32,
    pub background: Vec3,

    /// Seed of the random number generator that drives all passes; the same
    /// seed, scene and camera produce the same frames.
    pub seed: u64,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.candidate_count == 0 {
            return Err(Error::invalid_config(
                "candidate_count must be greater than zero",
            ));
        }

        if !(self.max_history >= 1.0) {
            return Err(Error::invalid_config(
                "max_history must be at least one",
            ));
        }

        let thresholds = [
            ("temporal_normal_threshold", self.temporal_normal_threshold),
            ("temporal_depth_threshold", self.temporal_depth_threshold),
            ("spatial_normal_threshold", self.spatial_normal_threshold),
            ("spatial_depth_threshold", self.spatial_depth_threshold),
        ];

        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_config(format!(
                    "{name} must be within <0.0, 1.0>, got {value}"
                )));
            }
        }

        if self.spatial {
            if self.spatial_sample_count == 0 {
                return Err(Error::invalid_config(
                    "spatial_sample_count must be greater than zero",
                ));
            }

            if !(self.spatial_radius > 0.0) || !(self.spatial_min_radius >= 0.0)
            {
                return Err(Error::invalid_config(
                    "spatial radii must be positive",
                ));
            }
        }

        if !(self.ambient >= 0.0) {
            return Err(Error::invalid_config("ambient must be non-negative"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            candidate_count: 32,
            light_sampling: gpu::LightSampling::Power,
            temporal: true,
            spatial: true,
            max_history: 20.0,
            temporal_normal_threshold: 0.9,
            temporal_depth_threshold: 0.1,
            spatial_sample_count: 5,
            spatial_radius: 30.0,
            spatial_min_radius: 3.0,
            spatial_normal_threshold: 0.9,
            spatial_depth_threshold: 0.1,
            shadow_rays: true,
            ambient: 0.0,
            background: Vec3::ZERO,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: Config) {
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn validate() {
        assert!(Config::default().validate().is_ok());

        assert_invalid(Config {
            candidate_count: 0,
            ..Default::default()
        });

        assert_invalid(Config {
            max_history: 0.0,
            ..Default::default()
        });

        assert_invalid(Config {
            max_history: f32::NAN,
            ..Default::default()
        });

        assert_invalid(Config {
            temporal_normal_threshold: 1.5,
            ..Default::default()
        });

        assert_invalid(Config {
            spatial_depth_threshold: -0.1,
            ..Default::default()
        });

        assert_invalid(Config {
            spatial_radius: 0.0,
            ..Default::default()
        });

        // Spatial knobs don't matter when spatial reuse is disabled
        assert!(Config {
            spatial: false,
            spatial_sample_count: 0,
            ..Default::default()
        }
        .validate()
        .is_ok());
    }
}
