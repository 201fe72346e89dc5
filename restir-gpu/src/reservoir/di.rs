use core::ops::{Deref, DerefMut};

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

use crate::{
    AreaLight, Brdf, Hit, LightId, LightsView, Ray, Reservoir, Vec3Ext,
    RESTIR_EPSILON,
};

/// Reservoir of direct-lighting samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DiReservoir {
    pub reservoir: Reservoir<DiSample>,
}

/// Storage layout of [`DiReservoir`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DiReservoirData {
    pub m: f32,
    pub w_sum: f32,
    pub w: f32,
    pub pdf: f32,
    pub light_id: u32,
    pub is_occluded: u32,
    // Add padding to align `light_point` to 16 bytes
    pub _padding: [u32; 2],

    /// xyz - point on the light
    /// w - light's area
    pub light_point: Vec4,

    /// xyz - light's normal
    /// w - unused
    pub light_normal: Vec4,
}

impl DiReservoir {
    pub fn read(buffer: &[DiReservoirData], id: usize) -> Self {
        Self::deserialize(buffer[id])
    }

    pub fn deserialize(data: DiReservoirData) -> Self {
        Self {
            reservoir: Reservoir {
                sample: DiSample {
                    light_id: LightId::new(data.light_id),
                    light_point: data.light_point.xyz(),
                    light_normal: data.light_normal.xyz(),
                    light_area: data.light_point.w,
                    pdf: data.pdf,
                    is_occluded: data.is_occluded != 0,
                },
                w_sum: data.w_sum,
                m: data.m,
                w: data.w,
            },
        }
    }

    pub fn serialize(&self) -> DiReservoirData {
        DiReservoirData {
            m: self.m,
            w_sum: self.w_sum,
            w: self.w,
            pdf: self.sample.pdf,
            light_id: self.sample.light_id.get(),
            is_occluded: self.sample.is_occluded as u32,
            _padding: [0; 2],
            light_point: self.sample.light_point.extend(self.sample.light_area),
            light_normal: self.sample.light_normal.extend(0.0),
        }
    }
}

impl Deref for DiReservoir {
    type Target = Reservoir<DiSample>;

    fn deref(&self) -> &Self::Target {
        &self.reservoir
    }
}

impl DerefMut for DiReservoir {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reservoir
    }
}

/// Point on an area light, as seen from a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DiSample {
    pub light_id: LightId,
    pub light_point: Vec3,
    pub light_normal: Vec3,
    pub light_area: f32,

    /// Target pdf of this sample at the surface owning the reservoir.
    pub pdf: f32,

    pub is_occluded: bool,
}

impl DiSample {
    pub fn new(light_id: LightId, light: AreaLight, light_point: Vec3) -> Self {
        Self {
            light_id,
            light_point,
            light_normal: light.normal(),
            light_area: light.area(),
            pdf: 0.0,
            is_occluded: false,
        }
    }

    /// Returns light reflected from this sample towards the hit's origin,
    /// disregarding visibility: `brdf * radiance * cos_surface * cos_light /
    /// distance²`.
    pub fn eval(self, light: AreaLight, hit: Hit) -> Vec3 {
        let to_light = self.light_point - hit.point;
        let distance_squared = to_light.length_squared();

        if distance_squared < RESTIR_EPSILON {
            return Vec3::ZERO;
        }

        let l = to_light / distance_squared.sqrt();
        let cos_surface = hit.gbuffer.normal.dot(l);
        let cos_light = self.light_normal.dot(-l);

        if cos_surface <= 0.0 || cos_light <= 0.0 {
            return Vec3::ZERO;
        }

        Brdf::new(&hit.gbuffer).eval(l, -hit.dir)
            * light.radiance()
            * (cos_surface * cos_light / distance_squared)
    }

    /// Returns target pdf of this sample at given hit; zero if the sample
    /// doesn't lay on its light anymore.
    pub fn target_pdf(self, lights: LightsView, hit: Hit) -> f32 {
        let light = lights.get(self.light_id);

        if light.contains(self.light_point) {
            self.eval(light, hit).luma()
        } else {
            0.0
        }
    }

    /// Returns a shadow ray going from given point towards this sample.
    pub fn ray(self, hit_point: Vec3) -> Ray {
        let dir = self.light_point - hit_point;
        let len = dir.length();

        Ray::new(hit_point, dir.normalize_or_zero())
            .with_len(len - Hit::NUDGE_OFFSET)
    }
}
