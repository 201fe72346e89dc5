use log::debug;

use crate::{
    gpu, Camera, Device, DoubleBuffered, PingPong, Result, StorageBuffer,
    Texture, UniformBuffer,
};

#[derive(Debug)]
pub struct CameraBuffers {
    pub curr_camera: UniformBuffer<gpu::Camera>,
    pub prev_camera: UniformBuffer<gpu::Camera>,

    /// See: [`gpu::GBufferEntry`].
    pub gbuffer_d0: Texture,
    pub gbuffer_d1: Texture,
    pub gbuffer_d2: Texture,
    pub gbuffer_d3: Texture,

    /// See: [`gpu::Reprojection`].
    pub reprojection_map: Texture,

    /// Reservoirs passed from one pass to another within a frame.
    pub reservoirs: PingPong<StorageBuffer<gpu::DiReservoirData>>,

    pub history: History,
    pub color: Texture,
}

impl CameraBuffers {
    pub fn new(device: &Device, camera: &Camera) -> Result<Self> {
        debug!("Initializing camera buffers");

        let size = camera.viewport;
        let len = (size.x * size.y) as usize;

        let curr_camera = UniformBuffer::new(
            device,
            "restir_curr_camera",
            camera.serialize(),
        )?;

        let prev_camera = UniformBuffer::new(
            device,
            "restir_prev_camera",
            camera.serialize(),
        )?;

        let gbuffer_d0 = Texture::new(device, "restir_gbuffer_d0", size)?;
        let gbuffer_d1 = Texture::new(device, "restir_gbuffer_d1", size)?;
        let gbuffer_d2 = Texture::new(device, "restir_gbuffer_d2", size)?;
        let gbuffer_d3 = Texture::new(device, "restir_gbuffer_d3", size)?;

        let reprojection_map =
            Texture::new(device, "restir_reprojection_map", size)?;

        let reservoirs = PingPong::<StorageBuffer<_>>::new(
            device,
            "restir_reservoirs",
            len,
        )?;

        let history = History::new(device, camera)?;
        let color = Texture::new(device, "restir_color", size)?;

        Ok(Self {
            curr_camera,
            prev_camera,
            gbuffer_d0,
            gbuffer_d1,
            gbuffer_d2,
            gbuffer_d3,
            reprojection_map,
            reservoirs,
            history,
            color,
        })
    }
}

/// What a frame leaves behind for the next one; written by the resolving pass
/// into the current slots and read by the temporal resampling pass from the
/// previous ones.
#[derive(Debug)]
pub struct History {
    pub reservoirs: DoubleBuffered<StorageBuffer<gpu::DiReservoirData>>,

    /// See: [`gpu::SurfacesView`].
    pub surface_d0: DoubleBuffered<Texture>,
    pub surface_d1: DoubleBuffered<Texture>,
}

impl History {
    fn new(device: &Device, camera: &Camera) -> Result<Self> {
        let size = camera.viewport;
        let len = (size.x * size.y) as usize;

        Ok(Self {
            reservoirs: DoubleBuffered::<StorageBuffer<_>>::new(
                device,
                "restir_history_reservoirs",
                len,
            )?,
            surface_d0: DoubleBuffered::<Texture>::new(
                device,
                "restir_history_surface_d0",
                size,
            )?,
            surface_d1: DoubleBuffered::<Texture>::new(
                device,
                "restir_history_surface_d1",
                size,
            )?,
        })
    }
}
