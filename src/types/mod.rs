pub mod color;
pub mod glyphs;
pub mod primitive;
pub mod viewport;

pub use color::{Color, Gradient4};
pub use glyphs::{Alphabet, GlyphSource};
pub use primitive::{GlyphPrimitive, PrimVertex, vertex_bytes};
pub use viewport::Viewport;
