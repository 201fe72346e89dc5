use restir_shaders::spatial_resampling;

use crate::{
    gpu, CameraBuffers, CameraComputePass, Device, Engine, Params,
    ResourceTracker, Result,
};

#[derive(Debug)]
pub struct SpatialResamplingPass {
    pass: CameraComputePass<gpu::SpatialResamplingPassParams>,
}

impl SpatialResamplingPass {
    pub fn new() -> Self {
        Self {
            pass: CameraComputePass::new("spatial_resampling"),
        }
    }

    pub fn run<P>(
        &self,
        engine: &Engine<P>,
        device: &Device,
        tracker: &mut ResourceTracker,
        buffers: &mut CameraBuffers,
        params: gpu::SpatialResamplingPassParams,
    ) -> Result<()>
    where
        P: Params,
    {
        let size = buffers.curr_camera.screen_size();
        let camera: &gpu::Camera = &buffers.curr_camera;
        let lights = engine.lights.buffer().data();
        let (input_reservoirs, output_reservoirs) = buffers.reservoirs.split();
        let input = input_reservoirs.data();

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
                input_reservoirs,
            ],
            &[&*output_reservoirs],
            params,
            |global_id, params| {
                spatial_resampling::main(
                    global_id,
                    params,
                    camera,
                    gpu::LightsView::new(lights),
                    gpu::GBufferView::new(gbuffer),
                    input,
                )
            },
        )?;

        output_reservoirs.write(outputs);

        self.pass.finish(tracker, &[&*output_reservoirs]);
        buffers.reservoirs.flip();

        Ok(())
    }
}
