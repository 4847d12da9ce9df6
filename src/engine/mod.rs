//! Frame orchestration: motion field, model overlay and draw submission.

pub mod bench;
pub mod overlay;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::mesh::{LoadOptions, Mesh, MeshBatch, ProjectionKind, load_mesh};
use crate::motion::{Execution, FrameContext, MotionField, MotionMode, Spawn};
use crate::render::Surface;
use crate::rng::session_rng;
use crate::types::{GlyphPrimitive, GlyphSource, Viewport};

pub use bench::{FrameStats, RunSummary, run_headless};
pub use overlay::MeshOverlay;

/// One animation session.
///
/// Owns every entity, the optional mesh overlay, the session random source
/// and the reusable glyph buffer handed to the surface each frame.
#[derive(Debug)]
pub struct AnimationEngine {
    viewport: Viewport,
    execution: Execution,
    glyph_size: f32,
    speed: f32,
    glyphs: GlyphSource,
    field: MotionField,
    overlay: Option<MeshOverlay>,
    rng: StdRng,
    /// Seed of the per-glyph flicker hash.
    seed: u64,
    elapsed: f32,
    frame: u64,
    buffer: Vec<GlyphPrimitive>,
}

impl AnimationEngine {
    /// Build the field for `config.mode` and try to load the overlay.
    ///
    /// A mesh that fails to load is logged and left out; the glyph
    /// animation runs regardless.
    pub fn new(config: &EngineConfig, viewport: Viewport) -> Self {
        let viewport = Viewport::new(viewport.width, viewport.height);
        let mut rng = session_rng(config.seed);
        let seed = config.seed.unwrap_or_else(|| rng.r#gen());
        let glyphs = GlyphSource::new(config.alphabet);
        let glyph_size = config.glyph_size.max(1.0);

        let spawn = Spawn {
            viewport,
            glyph_size,
            glyphs: &glyphs,
        };
        let field = MotionField::new(config.mode, config.count, &spawn, &mut rng);

        let overlay = config.model_path.as_ref().and_then(|path| {
            let options = LoadOptions {
                kind: config.style,
                flip_yz: config.flip_yz,
            };
            match load_mesh(path, &options) {
                Ok(mesh) => Some(MeshOverlay::new(mesh, config.projection, &mut rng)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Mesh overlay disabled");
                    None
                }
            }
        });

        info!(
            mode = %config.mode,
            exec = %config.execution,
            viewport = %viewport,
            entities = field.entity_count(),
            overlay = overlay.is_some(),
            "Engine ready"
        );

        Self {
            viewport,
            execution: config.execution,
            glyph_size,
            speed: config.speed,
            glyphs,
            field,
            overlay,
            rng,
            seed,
            elapsed: 0.0,
            frame: 0,
            buffer: Vec::new(),
        }
    }

    /// Replace the overlay with an already loaded mesh.
    pub fn set_mesh(&mut self, mesh: Mesh, projection: ProjectionKind) {
        self.overlay = Some(MeshOverlay::new(mesh, projection, &mut self.rng));
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Negative or non-finite steps count as zero. Every entity pass
    /// finishes before the automaton runs.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += dt;
        self.frame += 1;

        let ctx = FrameContext {
            dt,
            elapsed: self.elapsed,
            frame: self.frame,
            viewport: self.viewport,
            glyph_size: self.glyph_size,
            speed: self.speed,
            seed: self.seed,
            glyphs: &self.glyphs,
        };
        self.field.update(&ctx, self.execution);

        if let Some(overlay) = &mut self.overlay {
            overlay.update(dt * self.speed, self.viewport, &mut self.rng);
        }
    }

    /// Adapt to a new viewport without restarting the animation.
    pub fn resize(&mut self, viewport: Viewport) {
        let viewport = Viewport::new(viewport.width, viewport.height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        let spawn = Spawn {
            viewport,
            glyph_size: self.glyph_size,
            glyphs: &self.glyphs,
        };
        self.field.resize(&spawn, &mut self.rng);
        debug!(
            viewport = %viewport,
            entities = self.field.entity_count(),
            "Resized"
        );
    }

    /// Submit one glyph batch, then the mesh batch if an overlay is active.
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.buffer.clear();
        let ctx = FrameContext {
            dt: 0.0,
            elapsed: self.elapsed,
            frame: self.frame,
            viewport: self.viewport,
            glyph_size: self.glyph_size,
            speed: self.speed,
            seed: self.seed,
            glyphs: &self.glyphs,
        };
        self.field.emit(&ctx, &mut self.buffer);
        surface.draw_glyphs(&self.buffer);

        if let Some(overlay) = &mut self.overlay {
            match overlay.project(self.viewport) {
                MeshBatch::Lines(v) => surface.draw_lines(v),
                MeshBatch::Triangles(v) => surface.draw_triangles(v),
            }
        }
    }

    /// Update, stop if the surface was closed, otherwise draw.
    ///
    /// Returns whether the frame was drawn.
    pub fn frame<S: Surface + ?Sized>(&mut self, dt: f32, surface: &mut S) -> bool {
        self.update(dt);
        if !surface.is_open() {
            return false;
        }
        self.draw(surface);
        true
    }

    pub fn mode(&self) -> MotionMode {
        self.field.mode()
    }

    pub fn execution(&self) -> Execution {
        self.execution
    }

    pub fn entity_count(&self) -> usize {
        self.field.entity_count()
    }

    pub fn overlay(&self) -> Option<&MeshOverlay> {
        self.overlay.as_ref()
    }

    pub fn field(&self) -> &MotionField {
        &self.field
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}
