//! Per-entity motion models.
//!
//! Every mode owns its own entity type and implements [`Entity`]: one call to
//! [`Entity::step`] advances exactly one entity and touches nothing else, so a
//! whole pass can be split across the rayon pool with no synchronisation.

pub mod bounce;
pub mod dash;
pub mod flow;
pub mod nebula;
pub mod rain;
pub mod spiral;

use rand::Rng;
use rayon::prelude::*;

use crate::types::{GlyphPrimitive, GlyphSource, Viewport};

pub use bounce::{BounceField, BounceGlyph};
pub use dash::DashLine;
pub use nebula::{NebulaField, NebulaGlyph, WallContact};
pub use rain::{Drop, RainField};
pub use spiral::{SpiralField, SpiralGlyph};

/// Selectable animation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MotionMode {
    #[default]
    #[value(name = "rain")]
    Rain,
    #[value(name = "bounce")]
    Bounce,
    #[value(name = "spiral")]
    Spiral,
    #[value(name = "nebula")]
    Nebula,
}

impl std::fmt::Display for MotionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionMode::Rain => write!(f, "rain"),
            MotionMode::Bounce => write!(f, "bounce"),
            MotionMode::Spiral => write!(f, "spiral"),
            MotionMode::Nebula => write!(f, "nebula"),
        }
    }
}

/// How a per-entity pass is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    Sequential,
    #[default]
    Parallel,
}

impl std::fmt::Display for Execution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Execution::Sequential => write!(f, "seq"),
            Execution::Parallel => write!(f, "par"),
        }
    }
}

/// Read-only inputs shared by every entity during one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the engine started.
    pub elapsed: f32,
    pub frame: u64,
    pub viewport: Viewport,
    /// Nominal glyph size in pixels.
    pub glyph_size: f32,
    /// Global speed multiplier.
    pub speed: f32,
    /// Session seed for deterministic per-glyph effects.
    pub seed: u64,
    pub glyphs: &'a GlyphSource,
}

/// What a field needs to create or re-derive its entities.
#[derive(Debug, Clone, Copy)]
pub struct Spawn<'a> {
    pub viewport: Viewport,
    pub glyph_size: f32,
    pub glyphs: &'a GlyphSource,
}

/// One independently animated thing.
pub trait Entity: Send {
    /// Advance this entity by `ctx.dt`. Must only read `ctx` and write `self`.
    fn step(&mut self, ctx: &FrameContext<'_>);
}

/// Run one update pass over `entities`.
///
/// The call returns only after every entity has been stepped, which is the
/// frame barrier the next pass or the draw relies on.
pub fn advance<E: Entity>(entities: &mut [E], ctx: &FrameContext<'_>, execution: Execution) {
    match execution {
        Execution::Parallel => entities.par_iter_mut().for_each(|e| e.step(ctx)),
        Execution::Sequential => entities.iter_mut().for_each(|e| e.step(ctx)),
    }
}

/// The active mode's entity collection.
#[derive(Debug, Clone)]
pub enum MotionField {
    Bounce(BounceField),
    Spiral(SpiralField),
    Rain(RainField),
    Nebula(NebulaField),
}

impl MotionField {
    /// Populate a field. `count` is ignored by rain, whose column count
    /// follows the viewport width.
    pub fn new<R: Rng + ?Sized>(
        mode: MotionMode,
        count: usize,
        spawn: &Spawn<'_>,
        rng: &mut R,
    ) -> Self {
        match mode {
            MotionMode::Bounce => MotionField::Bounce(BounceField::new(count, spawn, rng)),
            MotionMode::Spiral => MotionField::Spiral(SpiralField::new(count, spawn, rng)),
            MotionMode::Rain => MotionField::Rain(RainField::new(spawn, rng)),
            MotionMode::Nebula => MotionField::Nebula(NebulaField::new(count, spawn, rng)),
        }
    }

    pub fn mode(&self) -> MotionMode {
        match self {
            MotionField::Bounce(_) => MotionMode::Bounce,
            MotionField::Spiral(_) => MotionMode::Spiral,
            MotionField::Rain(_) => MotionMode::Rain,
            MotionField::Nebula(_) => MotionMode::Nebula,
        }
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, execution: Execution) {
        match self {
            MotionField::Bounce(f) => f.update(ctx, execution),
            MotionField::Spiral(f) => f.update(ctx, execution),
            MotionField::Rain(f) => f.update(ctx, execution),
            MotionField::Nebula(f) => f.update(ctx, execution),
        }
    }

    pub fn resize<R: Rng + ?Sized>(&mut self, spawn: &Spawn<'_>, rng: &mut R) {
        match self {
            MotionField::Bounce(f) => f.resize(spawn),
            MotionField::Spiral(f) => f.resize(spawn),
            MotionField::Rain(f) => f.resize(spawn, rng),
            MotionField::Nebula(f) => f.resize(spawn),
        }
    }

    /// Append this frame's glyphs to `out`.
    pub fn emit(&self, ctx: &FrameContext<'_>, out: &mut Vec<GlyphPrimitive>) {
        match self {
            MotionField::Bounce(f) => f.emit(ctx, out),
            MotionField::Spiral(f) => f.emit(ctx, out),
            MotionField::Rain(f) => f.emit(ctx, out),
            MotionField::Nebula(f) => f.emit(ctx, out),
        }
    }

    /// Number of independently updated entities.
    pub fn entity_count(&self) -> usize {
        match self {
            MotionField::Bounce(f) => f.glyphs.len(),
            MotionField::Spiral(f) => f.glyphs.len(),
            MotionField::Rain(f) => f.drops.len() + f.dashes.len(),
            MotionField::Nebula(f) => f.glyphs.len(),
        }
    }
}
