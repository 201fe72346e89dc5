use glam::{uvec2, Mat4, UVec2, Vec3};

use crate::gpu;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub mode: CameraMode,

    /// Size of the rendered image, in pixels.
    pub viewport: UVec2,

    /// World-to-view transform.
    pub view: Mat4,

    /// View-to-clip transform; expected to use reversed depth.
    pub projection: Mat4,
}

impl Camera {
    pub fn new(viewport: UVec2) -> Self {
        Self {
            mode: Default::default(),
            viewport,
            view: Mat4::IDENTITY,
            projection: Self::perspective(viewport, 45.0f32.to_radians()),
        }
    }

    pub fn with_mode(mut self, mode: CameraMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_look_at(mut self, eye: Vec3, target: Vec3, up: Vec3) -> Self {
        self.view = Mat4::look_at_rh(eye, target, up);
        self
    }

    /// Sets a perspective projection with given vertical field of view, in
    /// radians.
    pub fn with_fov(mut self, fov_y: f32) -> Self {
        self.projection = Self::perspective(self.viewport, fov_y);
        self
    }

    pub fn describe(&self) -> String {
        format!(
            "{}x{}, mode={:?}",
            self.viewport.x, self.viewport.y, self.mode
        )
    }

    /// Returns whether switching to `other` requires re-creating the
    /// resolution-dependent resources.
    pub fn is_invalidated_by(&self, other: &Self) -> bool {
        self.viewport != other.viewport
    }

    pub fn origin(&self) -> Vec3 {
        self.view.inverse().transform_point3(Vec3::ZERO)
    }

    pub(crate) fn serialize(&self) -> gpu::Camera {
        let projection_view = self.projection * self.view;

        gpu::Camera {
            projection_view,
            ndc_to_world: projection_view.inverse(),
            origin: self.origin().extend(0.0),
            screen: self.viewport.as_vec2().extend(0.0).extend(0.0),
        }
    }

    fn perspective(viewport: UVec2, fov_y: f32) -> Mat4 {
        let viewport = viewport.max(uvec2(1, 1)).as_vec2();

        Mat4::perspective_infinite_reverse_rh(
            fov_y,
            viewport.x / viewport.y,
            0.1,
        )
    }
}

/// What the resolving pass writes into the final image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    /// Shaded image
    #[default]
    Image,

    /// Shaded image without emission and ambient light
    DirectLightingOnly,

    /// Surfaces' diffuse albedo
    BaseAlbedo,

    /// Surfaces' normals, mapped into `<0.0, 1.0>`
    Normals,

    /// Length of reservoirs' histories, relative to the maximum
    Reservoirs,
}

impl CameraMode {
    pub(crate) fn serialize(&self) -> gpu::ResolvingMode {
        match self {
            CameraMode::Image => gpu::ResolvingMode::Image,
            CameraMode::DirectLightingOnly => {
                gpu::ResolvingMode::DirectLightingOnly
            }
            CameraMode::BaseAlbedo => gpu::ResolvingMode::BaseAlbedo,
            CameraMode::Normals => gpu::ResolvingMode::Normals,
            CameraMode::Reservoirs => gpu::ResolvingMode::Reservoirs,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    #[test]
    fn serialize() {
        let target = Camera::new(uvec2(64, 32)).with_look_at(
            vec3(0.0, 4.0, 4.0),
            Vec3::ZERO,
            Vec3::Y,
        );

        let camera = target.serialize();

        assert_relative_eq!(0.0, camera.origin().x, epsilon = 0.0001);
        assert_relative_eq!(4.0, camera.origin().y, epsilon = 0.0001);
        assert_relative_eq!(4.0, camera.origin().z, epsilon = 0.0001);
        assert_eq!(uvec2(64, 32), camera.screen_size());

        // Looking straight at the target should land at the screen's center
        let center = camera.world_to_screen(Vec3::ZERO).unwrap();

        assert_relative_eq!(31.5, center.x, epsilon = 0.001);
        assert_relative_eq!(15.5, center.y, epsilon = 0.001);
    }

    #[test]
    fn is_invalidated_by() {
        let target = Camera::new(uvec2(64, 32));

        assert!(!target.is_invalidated_by(
            &target.clone().with_mode(CameraMode::Normals)
        ));

        assert!(target.is_invalidated_by(&Camera::new(uvec2(32, 32))));
    }
}
