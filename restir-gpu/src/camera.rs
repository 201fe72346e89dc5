use bytemuck::{Pod, Zeroable};
use glam::{vec2, IVec2, Mat4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::Ray;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Camera {
    pub projection_view: Mat4,
    pub ndc_to_world: Mat4,
    pub origin: Vec4,
    pub screen: Vec4,
}

impl Camera {
    pub fn origin(&self) -> Vec3 {
        self.origin.xyz()
    }

    /// Given a point in world-coordinates, returns it in clip-coordinates.
    pub fn world_to_clip(&self, pos: Vec3) -> Vec4 {
        self.projection_view * pos.extend(1.0)
    }

    /// Given a point in world-coordinates, returns it in screen-coordinates
    /// (where pixel centers land on integer coordinates), or `None` if the
    /// point is behind the camera.
    pub fn world_to_screen(&self, pos: Vec3) -> Option<Vec2> {
        let clip = self.world_to_clip(pos);

        if clip.w <= 0.0 {
            return None;
        }

        Some(self.clip_to_screen(clip))
    }

    /// Given a point in clip-coordinates, returns it in screen-coordinates.
    pub fn clip_to_screen(&self, pos: Vec4) -> Vec2 {
        let ndc = pos.xy() / pos.w;
        let ndc = vec2(ndc.x, -ndc.y);

        (0.5 * ndc + 0.5) * self.screen.xy() - 0.5
    }

    /// Given a point in screen-coordinates, returns a unique index for it; used
    /// to index screen-space structures.
    pub fn screen_to_idx(&self, pos: UVec2) -> usize {
        (pos.y * (self.screen.x as u32) + pos.x) as usize
    }

    pub fn screen_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    /// Returns whether given point lays inside the screen.
    pub fn contains(&self, pos: IVec2) -> bool {
        let screen_size = self.screen.xy().as_ivec2();

        pos.x >= 0
            && pos.y >= 0
            && pos.x < screen_size.x
            && pos.y < screen_size.y
    }

    /// Casts a ray from camera's origin through the center of given pixel.
    pub fn ray(&self, screen_pos: UVec2) -> Ray {
        let screen_size = self.screen.xy();

        let ndc =
            (screen_pos.as_vec2() + 0.5) * 2.0 / screen_size - Vec2::ONE;

        let ndc = vec2(ndc.x, -ndc.y);
        let near_plane = self.ndc_to_world.project_point3(ndc.extend(1.0));

        Ray::new(self.origin(), (near_plane - self.origin()).normalize())
    }
}
