use restir_shaders::temporal_resampling;

use crate::{
    gpu, CameraBuffers, CameraComputePass, Device, Engine, Params,
    ResourceTracker, Result,
};

#[derive(Debug)]
pub struct TemporalResamplingPass {
    pass: CameraComputePass<gpu::TemporalResamplingPassParams>,
}

impl TemporalResamplingPass {
    pub fn new() -> Self {
        Self {
            pass: CameraComputePass::new("temporal_resampling"),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn run<P>(
        &self,
        engine: &Engine<P>,
        device: &Device,
        tracker: &mut ResourceTracker,
        buffers: &mut CameraBuffers,
        alternate: bool,
        params: gpu::TemporalResamplingPassParams,
    ) -> Result<()>
    where
        P: Params,
    {
        let size = buffers.curr_camera.screen_size();
        let camera: &gpu::Camera = &buffers.curr_camera;
        let lights = engine.lights.buffer().data();
        let history = &buffers.history;
        let prev_reservoirs = history.reservoirs.prev(alternate);
        let prev_surface_d0 = history.surface_d0.prev(alternate);
        let prev_surface_d1 = history.surface_d1.prev(alternate);
        let (curr_reservoirs, reservoirs) = buffers.reservoirs.split();
        let reprojection_map = buffers.reprojection_map.data();

        let prev_surfaces =
            [prev_surface_d0.data(), prev_surface_d1.data()];

        let prev_reservoirs_data = prev_reservoirs.data();
        let curr_reservoirs_data = curr_reservoirs.data();

        let gbuffer = [
            buffers.gbuffer_d0.data(),
            buffers.gbuffer_d1.data(),
            buffers.gbuffer_d2.data(),
            buffers.gbuffer_d3.data(),
        ];

        let outputs = self.pass.run(
            device,
            tracker,
            size,
            &[
                engine.lights.buffer(),
                &buffers.curr_camera,
                &buffers.gbuffer_d0,
                &buffers.gbuffer_d1,
                &buffers.gbuffer_d2,
                &buffers.gbuffer_d3,
                &buffers.reprojection_map,
                prev_surface_d0,
                prev_surface_d1,
                prev_reservoirs,
                curr_reservoirs,
            ],
            &[&*reservoirs],
            params,
            |global_id, params| {
                temporal_resampling::main(
                    global_id,
                    params,
                    camera,
                    gpu::LightsView::new(lights),
                    gpu::GBufferView::new(gbuffer),
                    gpu::ReprojectionMap::new(reprojection_map),
                    gpu::SurfacesView::new(prev_surfaces),
                    prev_reservoirs_data,
                    curr_reservoirs_data,
                )
            },
        )?;

        reservoirs.write(outputs);

        self.pass.finish(tracker, &[&*reservoirs]);
        buffers.reservoirs.flip();

        Ok(())
    }
}
