use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::flow::ping_pong;
use super::{Entity, Execution, FrameContext, Spawn, advance};
use crate::rng::signed_range;
use crate::types::{Color, GlyphPrimitive, Viewport};

/// Depth half-range; `z` oscillates in `[-Z_MAX, Z_MAX]`.
pub const Z_MAX: f32 = 250.0;
/// Focal length of the depth perspective.
pub const FOCAL: f32 = 500.0;
/// Radius modulation runs at 0.9× the orbit angle.
const RADIUS_WOBBLE: f32 = 0.9;
/// Smallest angle span after which both `cos(angle)` and `sin(0.9 * angle)`
/// repeat; wrapping by it keeps the angle small without a visible jump.
const ANGLE_PERIOD: f32 = 10.0 * TAU;

/// A glyph orbiting the viewport centre with a wobbling radius and depth.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralGlyph {
    pub glyph: char,
    pub angle: f32,
    pub angular_velocity: f32,
    pub base_radius: f32,
    pub radius_amp: f32,
    pub z: f32,
    pub z_velocity: f32,
    pub phase: f32,
    /// Derived screen position (glyph centre).
    pub position: Vec2,
    /// Derived perspective factor `f / (f + z)`.
    pub perspective: f32,
}

impl SpiralGlyph {
    pub fn spawn<R: Rng + ?Sized>(spawn: &Spawn<'_>, rng: &mut R) -> Self {
        let min_side = spawn.viewport.min_side();
        let mut g = Self {
            glyph: spawn.glyphs.pick(rng),
            angle: rng.gen_range(0.0..TAU),
            angular_velocity: signed_range(rng, 0.3, 1.2),
            base_radius: rng.gen_range(0.08..=0.42) * min_side,
            radius_amp: rng.gen_range(6.0..=40.0),
            z: rng.gen_range(-Z_MAX..=Z_MAX),
            z_velocity: signed_range(rng, 40.0, 140.0),
            phase: rng.gen_range(0.0..TAU),
            position: Vec2::ZERO,
            perspective: 1.0,
        };
        g.place(spawn.viewport);
        g
    }

    pub fn radius(&self) -> f32 {
        self.base_radius + self.radius_amp * (self.phase + self.angle * RADIUS_WOBBLE).sin()
    }

    /// Recompute the derived screen position from the polar state.
    fn place(&mut self, viewport: Viewport) {
        self.perspective = perspective(self.z);
        let (sin, cos) = self.angle.sin_cos();
        self.position = viewport.center() + Vec2::new(cos, sin) * self.radius() * self.perspective;
    }

    pub fn alpha(&self) -> u8 {
        (255.0 * (0.6 * self.perspective).clamp(0.15, 1.0)).round() as u8
    }
}

impl Entity for SpiralGlyph {
    fn step(&mut self, ctx: &FrameContext<'_>) {
        let dt = ctx.dt * ctx.speed;
        self.angle = (self.angle + self.angular_velocity * dt).rem_euclid(ANGLE_PERIOD);
        if self.angle >= ANGLE_PERIOD {
            self.angle = 0.0;
        }
        ping_pong(&mut self.z, &mut self.z_velocity, dt, -Z_MAX, Z_MAX);
        self.place(ctx.viewport);
    }
}

/// Perspective factor for depth `z`; near (negative z) is larger than 1.
#[inline]
pub fn perspective(z: f32) -> f32 {
    FOCAL / (FOCAL + z.clamp(-Z_MAX, Z_MAX))
}

/// All spiral glyphs of a session.
#[derive(Debug, Clone)]
pub struct SpiralField {
    pub glyphs: Vec<SpiralGlyph>,
    viewport: Viewport,
}

impl SpiralField {
    pub fn new<R: Rng + ?Sized>(count: usize, spawn: &Spawn<'_>, rng: &mut R) -> Self {
        let glyphs = (0..count.max(1))
            .map(|_| SpiralGlyph::spawn(spawn, rng))
            .collect();
        Self {
            glyphs,
            viewport: spawn.viewport,
        }
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, execution: Execution) {
        advance(&mut self.glyphs, ctx, execution);
    }

    /// Rescale orbit radii with the shorter viewport side.
    pub fn resize(&mut self, spawn: &Spawn<'_>) {
        let ratio = spawn.viewport.min_side() / self.viewport.min_side();
        for g in &mut self.glyphs {
            g.base_radius *= ratio;
            g.place(spawn.viewport);
        }
        self.viewport = spawn.viewport;
    }

    pub fn emit(&self, ctx: &FrameContext<'_>, out: &mut Vec<GlyphPrimitive>) {
        out.extend(self.glyphs.iter().map(|g| {
            let half = ctx.glyph_size * g.perspective * 0.5;
            GlyphPrimitive {
                scale: g.perspective,
                ..GlyphPrimitive::new(
                    g.glyph,
                    g.position - Vec2::splat(half),
                    ctx.glyph_size,
                    Color::MATRIX_GREEN.with_alpha(g.alpha()),
                )
            }
        }));
    }
}
