//! Vertex types for flat-shaded rendering

use bytemuck::{Pod, Zeroable};

/// Clip-space vertex with colour
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 4], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.54, 0.70, 0.92, 1.0];
    pub const GROUND: [f32; 4] = [0.85, 0.85, 0.80, 1.0];
    /// Multiplier applied while paused
    pub const PAUSED_TINT: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
    /// Multiplier applied after game over
    pub const GAME_OVER_TINT: [f32; 4] = [1.0, 0.45, 0.45, 1.0];
}
