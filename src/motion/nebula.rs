//! Drifting nebula: glyphs pushed around by a smooth flow field, spinning,
//! breathing in size and opacity, and bouncing softly off the walls.

use glam::Vec2;
use rand::Rng;

use super::flow::{flow_field, ping_pong};
use super::{Entity, Execution, FrameContext, Spawn, advance};
use crate::rng::signed_range;
use crate::types::{Color, Gradient4, GlyphPrimitive};

pub const MAX_SPEED: f32 = 90.0;
pub const RESTITUTION: f32 = 0.8;
pub const FRICTION: f32 = 0.92;
pub const SCALE_MIN: f32 = 0.6;
pub const SCALE_MAX: f32 = 1.6;
pub const ALPHA_MIN: f32 = 70.0;
pub const ALPHA_MAX: f32 = 255.0;

/// Which walls a glyph touched this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallContact {
    #[default]
    Free,
    X,
    Y,
    Corner,
}

impl WallContact {
    fn from_axes(x: bool, y: bool) -> Self {
        match (x, y) {
            (false, false) => WallContact::Free,
            (true, false) => WallContact::X,
            (false, true) => WallContact::Y,
            (true, true) => WallContact::Corner,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NebulaGlyph {
    pub glyph: char,
    /// Centre of the glyph.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees in `[0, 360)`.
    pub spin: f32,
    pub spin_velocity: f32,
    pub scale: f32,
    pub scale_velocity: f32,
    pub alpha: f32,
    pub alpha_velocity: f32,
    /// Per-glyph flow and colour decorrelation.
    pub seed: f32,
    pub color: Color,
    pub contact: WallContact,
}

impl NebulaGlyph {
    pub fn spawn<R: Rng + ?Sized>(spawn: &Spawn<'_>, rng: &mut R) -> Self {
        let size = spawn.viewport.size();
        let seed = rng.gen_range(0.0..1000.0);
        Self {
            glyph: spawn.glyphs.pick(rng),
            position: Vec2::new(rng.gen_range(0.0..=size.x), rng.gen_range(0.0..=size.y)),
            velocity: Vec2::new(rng.gen_range(-40.0..=40.0), rng.gen_range(-40.0..=40.0)),
            spin: rng.gen_range(0.0..360.0),
            spin_velocity: signed_range(rng, 15.0, 90.0),
            scale: rng.gen_range(0.7..=1.4),
            scale_velocity: signed_range(rng, 0.1, 0.4),
            alpha: rng.gen_range(90.0..=ALPHA_MAX),
            alpha_velocity: signed_range(rng, 20.0, 80.0),
            seed,
            color: nebula_color(0.0, seed),
            contact: WallContact::Free,
        }
    }

    pub fn half_extent(&self, glyph_size: f32) -> f32 {
        glyph_size * self.scale * 0.5
    }
}

impl Entity for NebulaGlyph {
    fn step(&mut self, ctx: &FrameContext<'_>) {
        let dt = ctx.dt * ctx.speed;

        self.velocity += flow_field(ctx.elapsed, self.seed) * dt;
        self.velocity = self.velocity.clamp_length_max(MAX_SPEED);
        self.position += self.velocity * dt;

        ping_pong(&mut self.scale, &mut self.scale_velocity, dt, SCALE_MIN, SCALE_MAX);
        ping_pong(&mut self.alpha, &mut self.alpha_velocity, dt, ALPHA_MIN, ALPHA_MAX);
        self.spin = (self.spin + self.spin_velocity * dt).rem_euclid(360.0);
        // rem_euclid can round up to the modulus for tiny negatives
        if self.spin >= 360.0 {
            self.spin = 0.0;
        }

        let half = self.half_extent(ctx.glyph_size);
        self.contact = resolve_walls(
            &mut self.position,
            &mut self.velocity,
            half,
            ctx.viewport.size(),
        );
        self.color = nebula_color(ctx.elapsed, self.seed);
    }
}

/// Colour of a glyph at time `t`.
pub fn nebula_color(t: f32, seed: f32) -> Color {
    Gradient4::NEBULA.sample_cyclic(0.05 * t + 0.137 * seed)
}

/// Keep a square footprint of half side `half` inside `size`.
///
/// The normal velocity component is reflected with [`RESTITUTION`] and the
/// tangential one damped by [`FRICTION`]. An axis narrower than the
/// footprint pins the glyph to its centre.
pub fn resolve_walls(position: &mut Vec2, velocity: &mut Vec2, half: f32, size: Vec2) -> WallContact {
    let hit_x = resolve_axis(&mut position.x, &mut velocity.x, half, size.x);
    let hit_y = resolve_axis(&mut position.y, &mut velocity.y, half, size.y);
    if hit_x {
        velocity.y *= FRICTION;
    }
    if hit_y {
        velocity.x *= FRICTION;
    }
    WallContact::from_axes(hit_x, hit_y)
}

fn resolve_axis(position: &mut f32, velocity: &mut f32, half: f32, extent: f32) -> bool {
    if extent < 2.0 * half {
        *position = extent * 0.5;
        *velocity = -*velocity * RESTITUTION;
        true
    } else if *position < half {
        *position = half;
        // Already moving inward keeps its sign and is only damped
        *velocity = velocity.abs() * RESTITUTION;
        true
    } else if *position > extent - half {
        *position = extent - half;
        *velocity = -velocity.abs() * RESTITUTION;
        true
    } else {
        false
    }
}

#[derive(Debug, Clone, Default)]
pub struct NebulaField {
    pub glyphs: Vec<NebulaGlyph>,
}

impl NebulaField {
    pub fn new<R: Rng + ?Sized>(count: usize, spawn: &Spawn<'_>, rng: &mut R) -> Self {
        let glyphs = (0..count.max(1))
            .map(|_| NebulaGlyph::spawn(spawn, rng))
            .collect();
        Self { glyphs }
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, execution: Execution) {
        advance(&mut self.glyphs, ctx, execution);
    }

    /// Pull glyphs back inside the new viewport; walls take over next step.
    pub fn resize(&mut self, spawn: &Spawn<'_>) {
        let size = spawn.viewport.size();
        for g in &mut self.glyphs {
            g.position = g.position.clamp(Vec2::ZERO, size);
        }
    }

    pub fn emit(&self, ctx: &FrameContext<'_>, out: &mut Vec<GlyphPrimitive>) {
        out.extend(self.glyphs.iter().map(|g| {
            let half = g.half_extent(ctx.glyph_size);
            GlyphPrimitive {
                rotation: g.spin,
                scale: g.scale,
                ..GlyphPrimitive::new(
                    g.glyph,
                    g.position - Vec2::splat(half),
                    ctx.glyph_size,
                    g.color.with_alpha(g.alpha.round() as u8),
                )
            }
        }));
    }
}
