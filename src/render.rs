//! Rasterization boundary.
//!
//! The engine never rasterizes anything itself. It hands finished batches to
//! a [`Surface`], one call per primitive type per frame.

use crate::types::{GlyphPrimitive, PrimVertex, vertex_bytes};

/// Something that can draw a frame's batches.
pub trait Surface {
    fn draw_glyphs(&mut self, glyphs: &[GlyphPrimitive]);

    /// Line list: every two vertices form one segment.
    fn draw_lines(&mut self, vertices: &[PrimVertex]);

    /// Triangle list: every three vertices form one triangle.
    fn draw_triangles(&mut self, vertices: &[PrimVertex]);

    /// `false` once the surface was closed; the frame loop stops.
    fn is_open(&self) -> bool {
        true
    }
}

/// Headless surface that counts what it is given and keeps the last batches.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    open: bool,
    /// Close automatically after this many glyph batches.
    close_after: Option<u64>,
    pub glyph_batches: u64,
    pub line_batches: u64,
    pub triangle_batches: u64,
    pub glyphs_drawn: u64,
    pub lines_drawn: u64,
    pub triangles_drawn: u64,
    /// Size of every mesh batch as it would be uploaded.
    pub mesh_bytes: u64,
    pub last_glyphs: Vec<GlyphPrimitive>,
    pub last_mesh: Vec<PrimVertex>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            open: true,
            close_after: None,
            glyph_batches: 0,
            line_batches: 0,
            triangle_batches: 0,
            glyphs_drawn: 0,
            lines_drawn: 0,
            triangles_drawn: 0,
            mesh_bytes: 0,
            last_glyphs: Vec::new(),
            last_mesh: Vec::new(),
        }
    }

    /// A surface that reports itself closed after `frames` glyph batches.
    pub fn closing_after(frames: u64) -> Self {
        Self {
            close_after: Some(frames),
            ..Self::new()
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Total draw calls received.
    pub fn batches(&self) -> u64 {
        self.glyph_batches + self.line_batches + self.triangle_batches
    }
}

impl Surface for RecordingSurface {
    fn draw_glyphs(&mut self, glyphs: &[GlyphPrimitive]) {
        self.glyph_batches += 1;
        self.glyphs_drawn += glyphs.len() as u64;
        self.last_glyphs.clear();
        self.last_glyphs.extend_from_slice(glyphs);
        if self.close_after.is_some_and(|n| self.glyph_batches >= n) {
            self.open = false;
        }
    }

    fn draw_lines(&mut self, vertices: &[PrimVertex]) {
        self.line_batches += 1;
        self.lines_drawn += (vertices.len() / 2) as u64;
        self.mesh_bytes += vertex_bytes(vertices).len() as u64;
        self.last_mesh.clear();
        self.last_mesh.extend_from_slice(vertices);
    }

    fn draw_triangles(&mut self, vertices: &[PrimVertex]) {
        self.triangle_batches += 1;
        self.triangles_drawn += (vertices.len() / 3) as u64;
        self.mesh_bytes += vertex_bytes(vertices).len() as u64;
        self.last_mesh.clear();
        self.last_mesh.extend_from_slice(vertices);
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use glam::Vec2;

    #[test]
    fn counts_batches_and_primitives() {
        let mut s = RecordingSurface::new();
        let glyph = GlyphPrimitive::new('0', Vec2::ZERO, 20.0, Color::MATRIX_GREEN);
        s.draw_glyphs(&[glyph, glyph]);
        let v = PrimVertex::new(Vec2::ONE, Color::MESH);
        s.draw_lines(&[v; 4]);
        s.draw_triangles(&[v; 6]);
        assert_eq!(s.glyph_batches, 1);
        assert_eq!(s.glyphs_drawn, 2);
        assert_eq!(s.lines_drawn, 2);
        assert_eq!(s.triangles_drawn, 2);
        assert_eq!(s.batches(), 3);
        assert_eq!(s.last_mesh.len(), 6);
        assert_eq!(s.mesh_bytes, 10 * 12);
    }

    #[test]
    fn closes_on_request() {
        let mut s = RecordingSurface::new();
        assert!(s.is_open());
        s.close();
        assert!(!s.is_open());
    }

    #[test]
    fn closes_after_frame_budget() {
        let mut s = RecordingSurface::closing_after(2);
        s.draw_glyphs(&[]);
        assert!(s.is_open());
        s.draw_glyphs(&[]);
        assert!(!s.is_open());
    }
}
