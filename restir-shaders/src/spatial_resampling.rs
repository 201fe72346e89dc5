use restir_gpu::prelude::*;

/// Combines each pixel's reservoir with reservoirs of nearby pixels laying on
/// the same surface.
///
/// Neighbours are visited in the order given by the pixel's noise stream, so
/// the outcome is deterministic for a given seed; if no neighbour gets merged,
/// the input reservoir is passed through untouched.
pub fn main(
    global_id: UVec2,
    params: &SpatialResamplingPassParams,
    camera: &Camera,
    lights: LightsView,
    gbuffer: GBufferView,
    input_reservoirs: &[DiReservoirData],
) -> DiReservoirData {
    let lhs_idx = camera.screen_to_idx(global_id);
    let lhs_data = input_reservoirs[lhs_idx];
    let lhs_gbuffer = gbuffer.get(lhs_idx);

    if lhs_gbuffer.is_none() {
        return lhs_data;
    }

    let mut wnoise = WhiteNoise::new(params.seed, global_id);
    let hit = Hit::new(camera.origin(), lhs_gbuffer);
    let lhs_surface = lhs_gbuffer.surface();
    let lhs = DiReservoir::deserialize(lhs_data);

    // Steep surfaces change depth quickly, so looking too far away would mostly
    // find neighbours on other surfaces
    let radius = {
        let slope =
            lhs_surface.depth_derivatives.length() / lhs_surface.depth;

        (params.radius / (1.0 + slope * params.radius))
            .clamp(params.min_radius.min(params.radius), params.radius)
    };

    let mut main = DiReservoir::default();
    let mut merged_any = false;

    main.merge(&mut wnoise, &lhs, lhs.sample.pdf);

    for _ in 0..params.sample_count {
        let offset = wnoise.sample_disk() * radius;
        let rhs_pos = (global_id.as_vec2() + offset).round().as_ivec2();

        if rhs_pos == global_id.as_ivec2() || !camera.contains(rhs_pos) {
            continue;
        }

        let rhs_idx = camera.screen_to_idx(rhs_pos.as_uvec2());
        let rhs_gbuffer = gbuffer.get(rhs_idx);
        let offset = (rhs_pos - global_id.as_ivec2()).as_vec2();

        let is_same_surface = lhs_surface.matches(
            &rhs_gbuffer.surface(),
            lhs_surface.depth_at(offset),
            params.normal_threshold,
            params.depth_threshold,
        );

        if !is_same_surface {
            continue;
        }

        let mut rhs = DiReservoir::read(input_reservoirs, rhs_idx);

        if rhs.is_empty() {
            continue;
        }

        rhs.sample.pdf = rhs.sample.target_pdf(lights, hit);
        main.merge(&mut wnoise, &rhs, rhs.sample.pdf);
        merged_any = true;
    }

    if !merged_any {
        return lhs_data;
    }

    let pdf = main.sample.pdf;

    main.finalize(pdf);
    main.clamp_m(params.max_history);
    main.serialize()
}
