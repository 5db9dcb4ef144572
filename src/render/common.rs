use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::camera::CameraState;

/// Values handed to the shader each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderParams {
    /// Seconds since the render loop started.
    pub time: f32,
    /// Drawable size in physical pixels.
    pub resolution: Vec2,
    /// `(pitch, yaw)` in radians.
    pub rotation: Vec2,
    pub zoom: f32,
}

impl ShaderParams {
    pub fn new(time: f32, resolution: Vec2, camera: CameraState) -> Self {
        Self {
            time,
            resolution,
            rotation: Vec2::new(camera.orientation.pitch, camera.orientation.yaw),
            zoom: camera.zoom,
        }
    }
}

/// GPU layout of [`ShaderParams`], mirrored by `Params` in the WGSL source.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShaderUniform {
    pub time: f32,
    pub zoom: f32,
    pub resolution: [f32; 2],
    pub rotation: [f32; 2],
    pub _padding: [f32; 2],
}

impl From<&ShaderParams> for ShaderUniform {
    fn from(params: &ShaderParams) -> Self {
        Self {
            time: params.time,
            zoom: params.zoom,
            resolution: params.resolution.to_array(),
            rotation: params.rotation.to_array(),
            _padding: [0.0; 2],
        }
    }
}
