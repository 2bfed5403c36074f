//! WGSL sources and the uniform block they share with the CPU.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

pub const POINTS_SOURCE: &str = include_str!("shaders/points.wgsl");
pub const BLIT_SOURCE: &str = include_str!("shaders/blit.wgsl");

/// Per-frame uniforms for the points pass. Layout matches `Uniforms` in
/// `points.wgsl` (144 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub point_size: f32,
    pub aspect: f32,
    pub target_height: f32,
    pub _padding: f32,
}

impl Uniforms {
    pub fn new(view_proj: Mat4, model: Mat4, point_size: f32, target_size: (u32, u32)) -> Self {
        let (width, height) = target_size;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            point_size,
            aspect: width.max(1) as f32 / height.max(1) as f32,
            target_height: height.max(1) as f32,
            _padding: 0.0,
        }
    }
}
