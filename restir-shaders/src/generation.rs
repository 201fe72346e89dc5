use restir_gpu::prelude::*;

/// What a single invocation of the generation pass writes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenerationOutput {
    pub gbuffer: [Vec4; 4],
    pub reprojection: Vec4,
    pub reservoir: DiReservoirData,
}

/// Traces the primary ray, fills the g-buffer + reprojection map and streams
/// `candidate_count` light candidates through a fresh reservoir.
#[allow(clippy::too_many_arguments)]
pub fn main(
    global_id: UVec2,
    params: &GenerationPassParams,
    curr_camera: &Camera,
    prev_camera: &Camera,
    world: &impl AccelerationStructure,
    triangles: TrianglesView,
    materials: MaterialsView,
    lights: LightsView,
) -> GenerationOutput {
    let mut wnoise = WhiteNoise::new(params.seed, global_id);
    let ray = curr_camera.ray(global_id);
    let triangle_hit = world.trace(ray);

    if triangle_hit.is_none() {
        return GenerationOutput::default();
    }

    // -------------------------------------------------------------------------

    let triangle = triangles.get(triangle_hit.triangle_id);
    let material = materials.get(triangle_hit.material_id);

    let normal = {
        let normal = triangle.shading_normal(triangle_hit.bary);

        if normal.dot(ray.dir()) > 0.0 {
            -normal
        } else {
            normal
        }
    };

    let depth_derivatives = {
        let plane_normal = triangle.face_normal();

        let depth_at = |pos: UVec2| {
            curr_camera
                .ray(pos)
                .intersect_plane(triangle_hit.point, plane_normal)
                .map(|depth| depth - triangle_hit.distance)
                .unwrap_or(0.0)
        };

        vec2(
            depth_at(global_id + uvec2(1, 0)),
            depth_at(global_id + uvec2(0, 1)),
        )
    };

    let gbuffer = GBufferEntry {
        position: triangle_hit.point,
        depth: triangle_hit.distance,
        normal,
        depth_derivatives,
        kd: material.kd(),
        roughness: material.roughness(),
        ks: material.ks(),
        material_type: material.ty(),
        material_id: triangle_hit.material_id,
    };

    // -------------------------------------------------------------------------

    let reprojection = if params.frame.is_cold() {
        Reprojection::default()
    } else {
        let prev_point = triangle.prev_point(triangle_hit.bary);

        match prev_camera.world_to_screen(prev_point) {
            Some(prev_pos)
                if prev_camera.contains(prev_pos.round().as_ivec2()) =>
            {
                Reprojection {
                    prev_x: prev_pos.x,
                    prev_y: prev_pos.y,
                    prev_depth: prev_point.distance(prev_camera.origin()),
                    validity: 1,
                }
            }

            _ => Reprojection::default(),
        }
    };

    // -------------------------------------------------------------------------

    let hit = Hit::new(curr_camera.origin(), gbuffer);
    let mut reservoir = DiReservoir::default();

    if !lights.is_empty() {
        for _ in 0..params.candidate_count {
            let Some((light_id, pick_pdf)) =
                lights.pick(&mut wnoise, params.light_sampling())
            else {
                break;
            };

            let light = lights.get(light_id);
            let light_point =
                light.sample_point(vec2(wnoise.sample(), wnoise.sample()));

            let mut sample = DiSample::new(light_id, light, light_point);

            sample.pdf = sample.eval(light, hit).luma();

            // Probability of having generated this sample, in area measure
            let source_pdf = pick_pdf / sample.light_area;

            let weight = sample.pdf.safe_div(source_pdf);

            reservoir.update(&mut wnoise, sample, weight);
        }
    }

    let pdf = reservoir.sample.pdf;

    reservoir.finalize(pdf);

    if reservoir.w > 0.0 && world.is_occluded(reservoir.sample.ray(hit.point)) {
        reservoir.w = 0.0;
        reservoir.sample.is_occluded = true;
    }

    GenerationOutput {
        gbuffer: gbuffer.pack(),
        reprojection: reprojection.serialize(),
        reservoir: reservoir.serialize(),
    }
}
