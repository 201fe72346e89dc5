use core::f32::consts::PI;

use glam::Vec3;

use crate::{F32Ext, GBufferEntry, MaterialType};

/// Surface's response to light, as described by its g-buffer entry.
#[derive(Clone, Copy)]
pub struct Brdf<'a> {
    gbuffer: &'a GBufferEntry,
}

impl<'a> Brdf<'a> {
    pub fn new(gbuffer: &'a GBufferEntry) -> Self {
        Self { gbuffer }
    }

    /// Evaluates the BRDF for light coming from `l` and leaving towards `v`
    /// (both pointing away from the surface).
    pub fn eval(self, l: Vec3, v: Vec3) -> Vec3 {
        let n = self.gbuffer.normal;
        let n_o_l = n.dot(l);

        if n_o_l <= 0.0 {
            return Vec3::ZERO;
        }

        let diffuse = DiffuseBrdf::new(self.gbuffer).eval(l, v, n, n_o_l);

        let specular = match self.gbuffer.material_type {
            MaterialType::Matte => Vec3::ZERO,
            MaterialType::Glossy => {
                SpecularBrdf::new(self.gbuffer).eval(l, v, n, n_o_l)
            }
        };

        diffuse + specular
    }
}

#[derive(Clone, Copy)]
pub struct DiffuseBrdf<'a> {
    gbuffer: &'a GBufferEntry,
}

impl<'a> DiffuseBrdf<'a> {
    pub fn new(gbuffer: &'a GBufferEntry) -> Self {
        Self { gbuffer }
    }

    pub fn eval(self, l: Vec3, v: Vec3, n: Vec3, n_o_l: f32) -> Vec3 {
        let h = (l + v).normalize_or_zero();
        let n_o_v = n.dot(v).max(0.0001);
        let l_o_h = l.dot(h).saturate();

        self.gbuffer.kd
            * fd_burley(self.gbuffer.clamped_roughness(), n_o_v, n_o_l, l_o_h)
    }
}

#[derive(Clone, Copy)]
pub struct SpecularBrdf<'a> {
    gbuffer: &'a GBufferEntry,
}

impl<'a> SpecularBrdf<'a> {
    pub fn new(gbuffer: &'a GBufferEntry) -> Self {
        Self { gbuffer }
    }

    pub fn eval(self, l: Vec3, v: Vec3, n: Vec3, n_o_l: f32) -> Vec3 {
        let h = (l + v).normalize_or_zero();
        let n_o_v = n.dot(v).max(0.0001);
        let n_o_h = n.dot(h).saturate();
        let l_o_h = l.dot(h).saturate();
        let roughness = self.gbuffer.clamped_roughness().sqr();

        let d = d_ggx(roughness, n_o_h);
        let v = v_smith_ggx_correlated(roughness, n_o_v, n_o_l);
        let f = f_schlick(self.gbuffer.ks, l_o_h);

        d * v * f
    }
}

fn fd_burley(roughness: f32, n_o_v: f32, n_o_l: f32, l_o_h: f32) -> f32 {
    let f90 = 0.5 + 2.0 * roughness * l_o_h * l_o_h;
    let light_scatter = f_schlick_f32(1.0, f90, n_o_l);
    let view_scatter = f_schlick_f32(1.0, f90, n_o_v);

    light_scatter * view_scatter * (1.0 / PI)
}

fn d_ggx(roughness: f32, n_o_h: f32) -> f32 {
    let one_minus_noh_squared = 1.0 - n_o_h * n_o_h;
    let a = n_o_h * roughness;
    let k = roughness / (one_minus_noh_squared + a * a);

    k * k * (1.0 / PI)
}

fn v_smith_ggx_correlated(roughness: f32, n_o_v: f32, n_o_l: f32) -> f32 {
    let a2 = roughness * roughness;
    let lambda_v = n_o_l * ((n_o_v - a2 * n_o_v) * n_o_v + a2).sqrt();
    let lambda_l = n_o_v * ((n_o_l - a2 * n_o_l) * n_o_l + a2).sqrt();

    0.5 / (lambda_v + lambda_l)
}

fn f_schlick(f0: Vec3, v_o_h: f32) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - v_o_h).max(0.0).powf(5.0)
}

fn f_schlick_f32(f0: f32, f90: f32, v_o_h: f32) -> f32 {
    f0 + (f90 - f0) * (1.0 - v_o_h).max(0.0).powf(5.0)
}
