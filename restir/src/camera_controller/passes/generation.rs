use restir_shaders::generation;

use crate::{
    gpu, CameraBuffers, CameraComputePass, Device, Engine, Params,
    ResourceTracker, Result,
};

#[derive(Debug)]
pub struct GenerationPass {
    pass: CameraComputePass<gpu::GenerationPassParams>,
}

impl GenerationPass {
    pub fn new() -> Self {
        Self {
            pass: CameraComputePass::new("generation"),
        }
    }

    pub fn run<P>(
        &self,
        engine: &Engine<P>,
        device: &Device,
        tracker: &mut ResourceTracker,
        buffers: &mut CameraBuffers,
        params: gpu::GenerationPassParams,
    ) -> Result<()>
    where
        P: Params,
    {
        let size = buffers.curr_camera.screen_size();
        let curr_camera: &gpu::Camera = &buffers.curr_camera;
        let prev_camera: &gpu::Camera = &buffers.prev_camera;
        let triangles = engine.triangles.data();
        let materials = engine.materials.buffer().data();
        let lights = engine.lights.buffer().data();

        let outputs = self.pass.run(
            device,
            tracker,
            size,
            &[
                &engine.triangles,
                engine.materials.buffer(),
                engine.lights.buffer(),
                &buffers.curr_camera,
                &buffers.prev_camera,
            ],
            &[
                &buffers.gbuffer_d0,
                &buffers.gbuffer_d1,
                &buffers.gbuffer_d2,
                &buffers.gbuffer_d3,
                &buffers.reprojection_map,
                buffers.reservoirs.dst(),
            ],
            params,
            |global_id, params| {
                let world = gpu::TrianglesView::new(triangles);

                generation::main(
                    global_id,
                    params,
                    curr_camera,
                    prev_camera,
                    &world,
                    world,
                    gpu::MaterialsView::new(materials),
                    gpu::LightsView::new(lights),
                )
            },
        )?;

        buffers.gbuffer_d0.write(outputs.iter().map(|out| out.gbuffer[0]));
        buffers.gbuffer_d1.write(outputs.iter().map(|out| out.gbuffer[1]));
        buffers.gbuffer_d2.write(outputs.iter().map(|out| out.gbuffer[2]));
        buffers.gbuffer_d3.write(outputs.iter().map(|out| out.gbuffer[3]));

        buffers
            .reprojection_map
            .write(outputs.iter().map(|out| out.reprojection));

        let (_, reservoirs) = buffers.reservoirs.split();

        reservoirs.write(outputs.iter().map(|out| out.reservoir));

        self.pass.finish(
            tracker,
            &[
                &buffers.gbuffer_d0,
                &buffers.gbuffer_d1,
                &buffers.gbuffer_d2,
                &buffers.gbuffer_d3,
                &buffers.reprojection_map,
                buffers.reservoirs.dst(),
            ],
        );

        buffers.reservoirs.flip();

        Ok(())
    }
}
