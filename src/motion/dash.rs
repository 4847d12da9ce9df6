use glam::Vec2;
use rand::Rng;

use super::bounce::bounce_axis;
use super::{Entity, FrameContext, Spawn};
use crate::rng::signed_range;
use crate::types::{Color, GlyphPrimitive};

pub const DOT: char = '·';
/// One dash row per this many pixels of height.
const ROW_PITCH: u32 = 120;
const MIN_DOTS: usize = 6;
pub const MAX_DOTS: usize = 14;
const ALPHA: u8 = 110;

/// A horizontal row of dots sliding left and right over the rain.
#[derive(Debug, Clone, PartialEq)]
pub struct DashLine {
    /// Left edge of the first dot.
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub spacing: f32,
    pub glyphs: Vec<char>,
}

impl DashLine {
    pub fn width(&self) -> f32 {
        self.glyphs.len() as f32 * self.spacing
    }

    pub fn emit(&self, ctx: &FrameContext<'_>, out: &mut Vec<GlyphPrimitive>) {
        let color = Color::MATRIX_GREEN.with_alpha(ALPHA);
        out.extend(self.glyphs.iter().enumerate().map(|(i, &glyph)| {
            GlyphPrimitive::new(
                glyph,
                Vec2::new(self.x + i as f32 * self.spacing, self.y),
                ctx.glyph_size,
                color,
            )
        }));
    }
}

impl Entity for DashLine {
    fn step(&mut self, ctx: &FrameContext<'_>) {
        let max = (ctx.viewport.width as f32 - self.width()).max(0.0);
        self.x += self.velocity * ctx.dt * ctx.speed;
        bounce_axis(&mut self.x, &mut self.velocity, max);
    }
}

/// One row per [`ROW_PITCH`] pixels of height, at least one.
pub fn spawn_rows<R: Rng + ?Sized>(spawn: &Spawn<'_>, rng: &mut R) -> Vec<DashLine> {
    let rows = (spawn.viewport.height / ROW_PITCH).max(1);
    let pitch = spawn.viewport.height as f32 / rows as f32;
    let spacing = spawn.glyph_size * 1.5;
    (0..rows)
        .map(|row| {
            let dots = rng.gen_range(MIN_DOTS..=MAX_DOTS);
            let width = dots as f32 * spacing;
            let max = (spawn.viewport.width as f32 - width).max(0.0);
            DashLine {
                x: rng.gen_range(0.0..=max),
                y: (row as f32 + 0.5) * pitch,
                velocity: signed_range(rng, 60.0, 180.0),
                spacing,
                glyphs: vec![DOT; dots],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::test_support::{ctx, spawn};
    use crate::rng::session_rng;
    use crate::types::Viewport;

    fn line(x: f32, velocity: f32) -> DashLine {
        DashLine {
            x,
            y: 100.0,
            velocity,
            spacing: 30.0,
            glyphs: vec![DOT; 10],
        }
    }

    #[test]
    fn row_count_follows_height() {
        let mut rng = session_rng(Some(3));
        assert_eq!(spawn_rows(&spawn(Viewport::new(800, 600)), &mut rng).len(), 5);
        assert_eq!(spawn_rows(&spawn(Viewport::new(800, 100)), &mut rng).len(), 1);
    }

    #[test]
    fn spawned_rows_fit_horizontally() {
        let mut rng = session_rng(Some(17));
        for row in spawn_rows(&spawn(Viewport::new(800, 600)), &mut rng) {
            assert!((MIN_DOTS..=MAX_DOTS).contains(&row.glyphs.len()));
            assert!(row.x >= 0.0 && row.x + row.width() <= 800.0);
            assert!((60.0..=180.0).contains(&row.velocity.abs()));
        }
    }

    #[test]
    fn bounces_off_right_edge() {
        let vp = Viewport::new(800, 600);
        // width 300 -> max x 500
        let mut l = line(490.0, 100.0);
        l.step(&ctx(vp, 0.5, 0.0, 0));
        assert_eq!(l.x, 500.0);
        assert_eq!(l.velocity, -100.0);
    }

    #[test]
    fn wider_than_viewport_pins_left() {
        let vp = Viewport::new(200, 600);
        let mut l = line(0.0, 120.0);
        l.step(&ctx(vp, 0.5, 0.0, 0));
        assert_eq!(l.x, 0.0);
    }

    #[test]
    fn emits_one_dot_per_glyph() {
        let mut out = Vec::new();
        line(10.0, 60.0).emit(&ctx(Viewport::default(), 0.0, 0.0, 0), &mut out);
        assert_eq!(out.len(), 10);
        assert_eq!(out[1].position.x, 40.0);
        assert!(out.iter().all(|g| g.glyph == DOT && g.color.a() == ALPHA));
    }
}
