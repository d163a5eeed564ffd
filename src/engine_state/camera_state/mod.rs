//! # Camera State Management
//!
//! Owns the viewer's camera and projection and turns them into the per-frame
//! uniforms the chunk renderer pushes.

use cgmath::{Deg, Point3, Vector3};

use super::rendering::FrameUniforms;

pub mod camera;

/// Default viewport size used before a surface reports its own.
pub const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);

/// The viewer: camera plus projection.
#[derive(Debug)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// Perspective projection of the viewport
    pub projection: camera::Projection,
}

impl CameraState {
    /// Places a level camera at `position` looking along +X.
    pub fn new(position: Point3<f32>) -> Self {
        let (width, height) = DEFAULT_VIEWPORT;
        Self {
            camera: camera::Camera::new(position, Deg(0.0), Deg(0.0)),
            projection: camera::Projection::new(width, height, Deg(45.0), 0.1, 100.0),
        }
    }

    /// Moves the camera by `delta` world units.
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.camera.position += delta;
    }

    /// View, projection and viewer position for this frame.
    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            view: self.camera.calc_matrix(),
            projection: self.projection.calc_matrix(),
            viewer_position: self.camera.position,
        }
    }
}
