use restir_gpu::prelude::*;

/// What a single invocation of the resolving pass writes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolvingOutput {
    pub color: Vec4,
    pub history_reservoir: DiReservoirData,
    pub history_surface: [Vec4; 2],
}

/// Shades each pixel using its final reservoir and hands the reservoir and
/// surface over to the next frame's history.
#[allow(clippy::too_many_arguments)]
pub fn main(
    global_id: UVec2,
    params: &ResolvingPassParams,
    camera: &Camera,
    world: &impl AccelerationStructure,
    lights: LightsView,
    materials: MaterialsView,
    gbuffer: GBufferView,
    reservoirs: &[DiReservoirData],
) -> ResolvingOutput {
    let idx = camera.screen_to_idx(global_id);
    let reservoir_data = reservoirs[idx];
    let gbuffer = gbuffer.get(idx);
    let [d0, d1, _, _] = gbuffer.pack();

    let history_surface = if gbuffer.is_some() {
        [d0, d1]
    } else {
        [Vec4::ZERO; 2]
    };

    if gbuffer.is_none() {
        return ResolvingOutput {
            color: Vec4::from_array(params.background),
            history_reservoir: reservoir_data,
            history_surface,
        };
    }

    // -------------------------------------------------------------------------

    let hit = Hit::new(camera.origin(), gbuffer);
    let reservoir = DiReservoir::deserialize(reservoir_data);
    let mut direct = Vec3::ZERO;

    if !reservoir.is_empty() && reservoir.w > 0.0 {
        let sample = reservoir.sample;
        let light = lights.get(sample.light_id);

        let is_visible = if params.shadow_rays() {
            !world.is_occluded(sample.ray(hit.point))
        } else {
            !sample.is_occluded
        };

        if is_visible && light.contains(sample.light_point) {
            direct = sample.eval(light, hit) * reservoir.w;
        }
    }

    let color = match params.mode() {
        ResolvingMode::Image => {
            let emissive = materials.get(gbuffer.material_id).emissive();

            emissive + params.ambient * gbuffer.kd + direct
        }

        ResolvingMode::DirectLightingOnly => direct,
        ResolvingMode::BaseAlbedo => gbuffer.kd,
        ResolvingMode::Normals => gbuffer.normal * 0.5 + 0.5,

        ResolvingMode::Reservoirs => {
            Vec3::splat(reservoir.m.safe_div(params.max_history).saturate())
        }
    };

    ResolvingOutput {
        color: color.extend(1.0),
        history_reservoir: reservoir_data,
        history_surface,
    }
}
