use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::Color;

/// A positioned text glyph handed to the rendering boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPrimitive {
    pub glyph: char,
    /// Top-left anchor in device pixels.
    pub position: Vec2,
    /// Character size in pixels before `scale`.
    pub size: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    pub scale: f32,
    pub color: Color,
}

impl GlyphPrimitive {
    pub fn new(glyph: char, position: Vec2, size: f32, color: Color) -> Self {
        Self {
            glyph,
            position,
            size,
            rotation: 0.0,
            scale: 1.0,
            color,
        }
    }
}

/// Coloured 2-D vertex for line and triangle batches.
///
/// `#[repr(C)]` + `Pod` so a whole batch can be reinterpreted as bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PrimVertex {
    pub position: [f32; 2],
    pub color: [u8; 4],
}

impl PrimVertex {
    pub fn new(position: Vec2, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }
}

/// View a vertex batch as raw bytes for upload.
pub fn vertex_bytes(vertices: &[PrimVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
