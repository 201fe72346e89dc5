use restir_shaders::resolving;

use crate::{
    gpu, CameraBuffers, CameraComputePass, Device, Engine, Params,
    ResourceTracker, Result,
};

#[derive(Debug)]
pub struct ResolvingPass {
    pass: CameraComputePass<gpu::ResolvingPassParams>,
}

impl ResolvingPass {
    pub fn new() -> Self {
        Self {
            pass: CameraComputePass::new("resolving"),
        }
    }

    /// Shades the frame out of `buffers.reservoirs.src()` and stores what the
    /// next frame needs into the history slots selected by `alternate`.
    pub fn run<P>(
        &self,
        engine: &Engine<P>,
        device: &Device,
        tracker: &mut ResourceTracker,
        buffers: &mut CameraBuffers,
        alternate: bool,
        params: gpu::ResolvingPassParams,
    ) -> Result<()>
    where
        P: Params,
    {
        let size = buffers.curr_camera.screen_size();
        let camera: &gpu::Camera = &buffers.curr_camera;
        let triangles = engine.triangles.data();
        let lights = engine.lights.buffer().data();
        let materials = engine.materials.buffer().data();
        let reservoirs = buffers.reservoirs.src().data();

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
                &engine.triangles,
                engine.lights.buffer(),
                engine.materials.buffer(),
                &buffers.curr_camera,
                &buffers.gbuffer_d0,
                &buffers.gbuffer_d1,
                &buffers.gbuffer_d2,
                &buffers.gbuffer_d3,
                buffers.reservoirs.src(),
            ],
            &[
                &buffers.color,
                buffers.history.reservoirs.curr(alternate),
                buffers.history.surface_d0.curr(alternate),
                buffers.history.surface_d1.curr(alternate),
            ],
            params,
            |global_id, params| {
                resolving::main(
                    global_id,
                    params,
                    camera,
                    &gpu::TrianglesView::new(triangles),
                    gpu::LightsView::new(lights),
                    gpu::MaterialsView::new(materials),
                    gpu::GBufferView::new(gbuffer),
                    reservoirs,
                )
            },
        )?;

        let history = &mut buffers.history;

        buffers.color.write(outputs.iter().map(|out| out.color));

        history
            .reservoirs
            .curr_mut(alternate)
            .write(outputs.iter().map(|out| out.history_reservoir));

        history
            .surface_d0
            .curr_mut(alternate)
            .write(outputs.iter().map(|out| out.history_surface[0]));

        history
            .surface_d1
            .curr_mut(alternate)
            .write(outputs.iter().map(|out| out.history_surface[1]));

        self.pass.finish(
            tracker,
            &[
                &buffers.color,
                buffers.history.reservoirs.curr(alternate),
                buffers.history.surface_d0.curr(alternate),
                buffers.history.surface_d1.curr(alternate),
            ],
        );

        Ok(())
    }
}
