use glam::Vec2;
use rand::Rng;

use super::{Entity, Execution, FrameContext, Spawn, advance};
use crate::rng::signed_range;
use crate::types::{Color, GlyphPrimitive};

/// Per-axis initial speed range, px/s.
const MIN_SPEED: f32 = 40.0;
const MAX_SPEED: f32 = 160.0;

/// A glyph flying in straight lines and reflecting off the viewport edges.
#[derive(Debug, Clone, PartialEq)]
pub struct BounceGlyph {
    pub glyph: char,
    /// Top-left corner.
    pub position: Vec2,
    pub velocity: Vec2,
    pub scale: f32,
}

impl BounceGlyph {
    pub fn spawn<R: Rng + ?Sized>(spawn: &Spawn<'_>, rng: &mut R) -> Self {
        let max = max_position(spawn.viewport.size(), spawn.glyph_size);
        let position = Vec2::new(rng.gen_range(0.0..=max.x), rng.gen_range(0.0..=max.y));
        Self {
            glyph: spawn.glyphs.pick(rng),
            position,
            velocity: Vec2::new(
                signed_range(rng, MIN_SPEED, MAX_SPEED),
                signed_range(rng, MIN_SPEED, MAX_SPEED),
            ),
            scale: size_pulse(position),
        }
    }
}

impl Entity for BounceGlyph {
    fn step(&mut self, ctx: &FrameContext<'_>) {
        let max = max_position(ctx.viewport.size(), ctx.glyph_size);
        self.position += self.velocity * ctx.dt * ctx.speed;
        bounce_axis(&mut self.position.x, &mut self.velocity.x, max.x);
        bounce_axis(&mut self.position.y, &mut self.velocity.y, max.y);
        self.scale = size_pulse(self.position);
    }
}

/// Largest top-left coordinate that keeps a glyph fully visible.
pub fn max_position(size: Vec2, glyph_size: f32) -> Vec2 {
    (size - Vec2::splat(glyph_size)).max(Vec2::ZERO)
}

/// Clamp one axis into `[0, max]`, turning the velocity inward on contact.
///
/// Returns whether the edge was touched.
pub fn bounce_axis(position: &mut f32, velocity: &mut f32, max: f32) -> bool {
    if *position < 0.0 {
        *position = 0.0;
        *velocity = velocity.abs();
        true
    } else if *position > max {
        *position = max;
        *velocity = -velocity.abs();
        true
    } else {
        false
    }
}

/// Cosmetic size pulse as a function of position.
pub fn size_pulse(position: Vec2) -> f32 {
    1.0 + 0.25 * (0.01 * (position.x + position.y)).sin()
}

/// All bounce glyphs of a session.
#[derive(Debug, Clone, Default)]
pub struct BounceField {
    pub glyphs: Vec<BounceGlyph>,
}

impl BounceField {
    pub fn new<R: Rng + ?Sized>(count: usize, spawn: &Spawn<'_>, rng: &mut R) -> Self {
        let glyphs = (0..count.max(1))
            .map(|_| BounceGlyph::spawn(spawn, rng))
            .collect();
        Self { glyphs }
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, execution: Execution) {
        advance(&mut self.glyphs, ctx, execution);
    }

    /// Pull glyphs back inside a smaller viewport; velocities are kept.
    pub fn resize(&mut self, spawn: &Spawn<'_>) {
        let max = max_position(spawn.viewport.size(), spawn.glyph_size);
        for g in &mut self.glyphs {
            g.position = g.position.clamp(Vec2::ZERO, max);
        }
    }

    pub fn emit(&self, ctx: &FrameContext<'_>, out: &mut Vec<GlyphPrimitive>) {
        out.extend(self.glyphs.iter().map(|g| GlyphPrimitive {
            scale: g.scale,
            ..GlyphPrimitive::new(g.glyph, g.position, ctx.glyph_size, Color::MATRIX_GREEN)
        }));
    }
}
