use restir_gpu::prelude::*;

/// Combines each pixel's fresh reservoir with its reprojected history.
///
/// Whenever the history can't be trusted (e.g. reprojection landed on another
/// surface or the history refers to a light that's gone), the current
/// reservoir is passed through untouched.
#[allow(clippy::too_many_arguments)]
pub fn main(
    global_id: UVec2,
    params: &TemporalResamplingPassParams,
    camera: &Camera,
    lights: LightsView,
    gbuffer: GBufferView,
    reprojection_map: ReprojectionMap,
    prev_surfaces: SurfacesView,
    prev_reservoirs: &[DiReservoirData],
    curr_reservoirs: &[DiReservoirData],
) -> DiReservoirData {
    let lhs_idx = camera.screen_to_idx(global_id);
    let lhs_data = curr_reservoirs[lhs_idx];
    let lhs_gbuffer = gbuffer.get(lhs_idx);

    if params.frame.is_cold() || lhs_gbuffer.is_none() {
        return lhs_data;
    }

    // -------------------------------------------------------------------------

    let reprojection = reprojection_map.get(lhs_idx);

    if reprojection.is_none() {
        return lhs_data;
    }

    let rhs_pos = reprojection.prev_pos_round();

    if !camera.contains(rhs_pos) {
        return lhs_data;
    }

    let rhs_idx = camera.screen_to_idx(rhs_pos.as_uvec2());

    let is_same_surface = lhs_gbuffer.surface().matches(
        &prev_surfaces.get(rhs_idx),
        reprojection.prev_depth,
        params.normal_threshold,
        params.depth_threshold,
    );

    if !is_same_surface {
        return lhs_data;
    }

    let mut rhs = DiReservoir::read(prev_reservoirs, rhs_idx);

    rhs.clamp_m(params.max_history);

    if rhs.is_empty() {
        return lhs_data;
    }

    // Lights might've moved or disappeared since the history got written;
    // history without any weight carries no sample, only its candidates
    if rhs.w_sum > 0.0 {
        let rhs_light = lights.get(rhs.sample.light_id);

        if !rhs_light.contains(rhs.sample.light_point) {
            return lhs_data;
        }
    }

    // -------------------------------------------------------------------------

    let mut wnoise = WhiteNoise::new(params.seed, global_id);
    let hit = Hit::new(camera.origin(), lhs_gbuffer);
    let lhs = DiReservoir::deserialize(lhs_data);
    let mut main = DiReservoir::default();

    main.merge(&mut wnoise, &lhs, lhs.sample.pdf);

    rhs.sample.pdf = rhs.sample.target_pdf(lights, hit);
    main.merge(&mut wnoise, &rhs, rhs.sample.pdf);

    let pdf = main.sample.pdf;

    main.finalize(pdf);
    main.clamp_m(params.max_history);
    main.serialize()
}
