//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in surface pixels with a straight-alpha colour
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Colors for page elements
pub mod colors {
    use crate::section::rgb;

    /// slate-900
    pub const BACKGROUND: [f32; 4] = rgb(0x0f172a);
    /// slate-700
    pub const MAZE_WALL: [f32; 4] = rgb(0x334155);
    /// slate-800
    pub const MAZE_PATH: [f32; 4] = rgb(0x1e293b);
    /// slate-600
    pub const LOCKED: [f32; 4] = rgb(0x475569);
    pub const PROJECTILE: [f32; 4] = rgb(0xf8fafc);
    pub const CROSSHAIR: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    pub const CRACK: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
    pub const LAUNCHER: [f32; 4] = rgb(0x94a3b8);
}
