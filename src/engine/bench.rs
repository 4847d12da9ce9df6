//! Headless fixed-step run with per-frame timing.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use super::AnimationEngine;
use crate::motion::Execution;
use crate::render::Surface;

/// Timing of one frame, milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    pub update_ms: f64,
    pub render_ms: f64,
    pub total_ms: f64,
}

/// Aggregate of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub exec: String,
    pub mode: String,
    pub threads_req: Option<usize>,
    pub threads_eff: usize,
    pub width: u32,
    pub height: u32,
    /// Independently updated entities.
    pub entities: usize,
    pub frames: u64,
    pub speed: f32,
    pub dt_s: f32,
    pub overlay: bool,
    pub glyphs_drawn: u64,
    /// Means over all drawn frames.
    pub update_ms: f64,
    pub render_ms: f64,
    pub total_ms: f64,
    pub fps: f64,
}

/// Drive `engine` for up to `frames` fixed steps of `dt` seconds.
///
/// Stops early when the surface closes. Glyph totals are taken from the
/// engine's own buffer size, so any surface works.
pub fn run_headless<S: Surface + ?Sized>(
    engine: &mut AnimationEngine,
    surface: &mut S,
    frames: u64,
    dt: f32,
    threads_req: Option<usize>,
) -> RunSummary {
    let mut totals = FrameStats {
        frame: 0,
        update_ms: 0.0,
        render_ms: 0.0,
        total_ms: 0.0,
    };
    let mut glyphs_drawn = 0u64;

    for _ in 0..frames {
        let start = Instant::now();
        engine.update(dt);
        let updated = Instant::now();
        if !surface.is_open() {
            info!(frame = engine.frame_count(), "Surface closed");
            break;
        }
        engine.draw(surface);
        let drawn = Instant::now();

        let stats = FrameStats {
            frame: engine.frame_count(),
            update_ms: (updated - start).as_secs_f64() * 1e3,
            render_ms: (drawn - updated).as_secs_f64() * 1e3,
            total_ms: (drawn - start).as_secs_f64() * 1e3,
        };
        debug!(
            frame = stats.frame,
            update_ms = stats.update_ms,
            render_ms = stats.render_ms,
            "Frame"
        );

        totals.frame += 1;
        totals.update_ms += stats.update_ms;
        totals.render_ms += stats.render_ms;
        totals.total_ms += stats.total_ms;
        glyphs_drawn += engine.buffer.len() as u64;
    }

    let n = totals.frame.max(1) as f64;
    let total_ms = totals.total_ms / n;
    let viewport = engine.viewport();
    let summary = RunSummary {
        exec: engine.execution().to_string(),
        mode: engine.mode().to_string(),
        threads_req,
        threads_eff: match engine.execution() {
            Execution::Sequential => 1,
            Execution::Parallel => rayon::current_num_threads(),
        },
        width: viewport.width,
        height: viewport.height,
        entities: engine.entity_count(),
        frames: totals.frame,
        speed: engine.speed(),
        dt_s: dt,
        overlay: engine.overlay().is_some(),
        glyphs_drawn,
        update_ms: totals.update_ms / n,
        render_ms: totals.render_ms / n,
        total_ms,
        fps: if total_ms > 0.0 { 1e3 / total_ms } else { 0.0 },
    };

    info!(
        frames = summary.frames,
        mode = %summary.mode,
        exec = %summary.exec,
        update_ms = summary.update_ms,
        render_ms = summary.render_ms,
        fps = summary.fps,
        "Run complete"
    );
    summary
}
