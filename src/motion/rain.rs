//! Column rain: each [`Drop`] is a head glyph followed by a fixed tail.
//!
//! Only the head position is stored. Every tail glyph's `y` is derived from
//! it with a modular wrap, so columns loop seamlessly and never accumulate
//! drift.

use glam::Vec2;
use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use super::dash::{self, DashLine};
use super::{Entity, Execution, FrameContext, Spawn, advance};
use crate::rng::hash3;
use crate::types::{Color, GlyphPrimitive, Viewport};

pub const MIN_GLYPHS: usize = 6;
pub const MAX_GLYPHS: usize = 26;
const MIN_SPEED: f32 = 70.0;
const MAX_SPEED: f32 = 220.0;
/// Per-glyph, per-frame flicker probability, out of 10 000.
pub const FLICKER_PER_10K: u64 = 35;
const HEAD_COLOR: Color = Color::rgb(200, 255, 200);

/// Distance after which a column's pattern repeats.
#[inline]
pub fn wrap_period(height: f32, tail: f32, spacing: f32) -> f32 {
    height + tail + spacing
}

/// Fold any `y` into `[-tail, height + spacing)`.
#[inline]
pub fn wrap_y(y: f32, tail: f32, period: f32) -> f32 {
    (y + tail).rem_euclid(period) - tail
}

/// Bring a head that ran past the bottom back into range.
///
/// Subtracts the whole number of periods in one step, however long the
/// stall was. A head already in range is returned unchanged.
pub fn correct_head(head: f32, height: f32, tail: f32, spacing: f32) -> f32 {
    let limit = height + spacing;
    if head < limit {
        return head;
    }
    let period = wrap_period(height, tail, spacing) as f64;
    let k = ((head as f64 + tail as f64) / period).floor();
    (head as f64 - k * period) as f32
}

/// One rain column.
#[derive(Debug, Clone, PartialEq)]
pub struct Drop {
    /// Stable id, mixed into the flicker hash.
    pub id: u32,
    pub x: f32,
    pub head_y: f32,
    /// Fall speed, px/s.
    pub speed: f32,
    pub spacing: f32,
    /// Head first, then the tail.
    pub glyphs: Vec<char>,
}

impl Drop {
    pub fn spawn<R: Rng + ?Sized>(id: u32, x: f32, spawn: &Spawn<'_>, rng: &mut R) -> Self {
        let count = rng.gen_range(MIN_GLYPHS..=MAX_GLYPHS);
        let spacing = spawn.glyph_size;
        let tail = count as f32 * spacing;
        let height = spawn.viewport.height as f32;
        Self {
            id,
            x,
            // Anywhere in the wrap window so columns start staggered
            head_y: rng.gen_range(-tail..height + spacing),
            speed: rng.gen_range(MIN_SPEED..=MAX_SPEED),
            spacing,
            glyphs: (0..count).map(|_| spawn.glyphs.pick(rng)).collect(),
        }
    }

    pub fn tail_len(&self) -> f32 {
        self.glyphs.len() as f32 * self.spacing
    }

    pub fn period(&self, height: f32) -> f32 {
        wrap_period(height, self.tail_len(), self.spacing)
    }

    /// Screen `y` of glyph `index` (0 = head).
    pub fn glyph_y(&self, index: usize, height: f32) -> f32 {
        let tail = self.tail_len();
        wrap_y(
            self.head_y - index as f32 * self.spacing,
            tail,
            wrap_period(height, tail, self.spacing),
        )
    }
}

impl Entity for Drop {
    fn step(&mut self, ctx: &FrameContext<'_>) {
        let height = ctx.viewport.height as f32;
        self.head_y += self.speed * ctx.dt * ctx.speed;
        self.head_y = correct_head(self.head_y, height, self.tail_len(), self.spacing);

        for (i, glyph) in self.glyphs.iter_mut().enumerate() {
            let h = hash3(ctx.seed, self.id as u64, i as u64, ctx.frame);
            if h % 10_000 < FLICKER_PER_10K {
                *glyph = ctx.glyphs.get((h >> 32) as usize);
            }
        }
    }
}

/// Aggregates over all columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RainStats {
    pub columns: usize,
    pub max_tail: usize,
    pub total_glyphs: usize,
}

/// Rain columns plus the bouncing dash rows drawn over them.
#[derive(Debug, Clone, Default)]
pub struct RainField {
    pub drops: Vec<Drop>,
    pub dashes: Vec<DashLine>,
}

impl RainField {
    pub fn new<R: Rng + ?Sized>(spawn: &Spawn<'_>, rng: &mut R) -> Self {
        let mut field = Self::default();
        field.regenerate(spawn, rng);
        field
    }

    /// Number of columns for a viewport, at least one.
    pub fn column_count(viewport: Viewport, glyph_size: f32) -> usize {
        ((viewport.width as f32 / glyph_size.max(1.0)) as usize).max(1)
    }

    fn regenerate<R: Rng + ?Sized>(&mut self, spawn: &Spawn<'_>, rng: &mut R) {
        let columns = Self::column_count(spawn.viewport, spawn.glyph_size);
        self.drops = (0..columns)
            .map(|c| Drop::spawn(c as u32, c as f32 * spawn.glyph_size, spawn, rng))
            .collect();
        self.dashes = dash::spawn_rows(spawn, rng);
    }

    pub fn update(&mut self, ctx: &FrameContext<'_>, execution: Execution) {
        advance(&mut self.drops, ctx, execution);
        advance(&mut self.dashes, ctx, execution);
    }

    /// Columns and dash rows depend on the viewport, so both are rebuilt.
    pub fn resize<R: Rng + ?Sized>(&mut self, spawn: &Spawn<'_>, rng: &mut R) {
        self.regenerate(spawn, rng);
        let stats = self.stats();
        debug!(
            columns = stats.columns,
            max_tail = stats.max_tail,
            total_glyphs = stats.total_glyphs,
            dashes = self.dashes.len(),
            "Regenerated rain field"
        );
    }

    /// Longest column, in glyphs.
    pub fn max_tail(&self) -> usize {
        self.drops
            .par_iter()
            .map(|d| d.glyphs.len())
            .max()
            .unwrap_or(0)
    }

    pub fn total_glyphs(&self) -> usize {
        self.drops.par_iter().map(|d| d.glyphs.len()).sum()
    }

    pub fn stats(&self) -> RainStats {
        RainStats {
            columns: self.drops.len(),
            max_tail: self.max_tail(),
            total_glyphs: self.total_glyphs(),
        }
    }

    pub fn emit(&self, ctx: &FrameContext<'_>, out: &mut Vec<GlyphPrimitive>) {
        let height = ctx.viewport.height as f32;
        out.reserve(self.total_glyphs() + self.dashes.len() * dash::MAX_DOTS);

        for drop in &self.drops {
            let n = drop.glyphs.len() as f32;
            for (i, &glyph) in drop.glyphs.iter().enumerate() {
                let y = drop.glyph_y(i, height);
                if y < -drop.spacing || y > height {
                    continue;
                }
                let color = if i == 0 {
                    let pulse = 0.75 + 0.25 * (6.0 * ctx.elapsed + 0.7 * drop.id as f32).sin();
                    HEAD_COLOR.scale_rgb(pulse)
                } else {
                    let fade = 1.0 - i as f32 / n;
                    Color::MATRIX_GREEN.with_alpha((40.0 + 215.0 * fade) as u8)
                };
                out.push(GlyphPrimitive::new(
                    glyph,
                    Vec2::new(drop.x, y),
                    ctx.glyph_size,
                    color,
                ));
            }
        }

        for line in &self.dashes {
            line.emit(ctx, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::test_support::{BINARY, ctx, spawn};
    use crate::rng::session_rng;
    use approx::assert_abs_diff_eq;

    fn drop(head_y: f32, count: usize) -> Drop {
        Drop {
            id: 3,
            x: 0.0,
            head_y,
            speed: 100.0,
            spacing: 20.0,
            glyphs: vec!['1'; count],
        }
    }

    #[test]
    fn glyph_position_is_periodic() {
        let height = 600.0;
        for count in [MIN_GLYPHS, 12, MAX_GLYPHS] {
            let d = drop(0.0, count);
            let period = d.period(height);
            for step in 0..40 {
                let head = -300.0 + step as f32 * 37.5;
                let a = drop(head, count);
                let b = drop(head + period, count);
                for i in 0..count {
                    assert_abs_diff_eq!(a.glyph_y(i, height), b.glyph_y(i, height), epsilon = 1e-3);
                }
            }
        }
    }

    #[test]
    fn wrapped_positions_stay_in_window() {
        let d = drop(451.0, 10);
        for i in 0..10 {
            let y = d.glyph_y(i, 600.0);
            assert!(y >= -d.tail_len() && y < 600.0 + d.spacing, "y {y}");
        }
    }

    #[test]
    fn tail_trails_head_by_spacing() {
        let d = drop(300.0, 8);
        for i in 0..8 {
            assert_abs_diff_eq!(d.glyph_y(i, 600.0), 300.0 - 20.0 * i as f32, epsilon = 1e-4);
        }
    }

    #[test]
    fn correction_is_identity_in_bounds() {
        for head in [-200.0, -1.0, 0.0, 250.0, 619.0] {
            let once = correct_head(head, 600.0, 200.0, 20.0);
            assert_eq!(once, head);
            assert_eq!(correct_head(once, 600.0, 200.0, 20.0), once);
        }
    }

    #[test]
    fn long_stall_corrects_in_one_step() {
        let (height, tail, spacing) = (600.0, 200.0, 20.0);
        let period = wrap_period(height, tail, spacing);
        let head = 100.0 + 57.0 * period;
        let corrected = correct_head(head, height, tail, spacing);
        assert!(corrected >= -tail && corrected < height + spacing);
        assert_abs_diff_eq!(corrected, 100.0, epsilon = 0.05);
        // Same visual state as before correction
        assert_abs_diff_eq!(
            wrap_y(corrected, tail, period),
            wrap_y(100.0, tail, period),
            epsilon = 0.05
        );
    }

    #[test]
    fn step_wraps_head_after_huge_dt() {
        let vp = Viewport::new(800, 600);
        let mut d = drop(0.0, 10);
        d.step(&ctx(vp, 3600.0, 0.0, 1));
        assert!(d.head_y >= -d.tail_len() && d.head_y < 620.0);
    }

    #[test]
    fn flicker_is_deterministic_and_rare() {
        let vp = Viewport::new(800, 600);
        let mut a = drop(0.0, MAX_GLYPHS);
        let mut b = a.clone();
        let mut changes = 0usize;
        for frame in 0..2000 {
            let before = a.glyphs.clone();
            let c = ctx(vp, 0.0, 0.0, frame);
            a.step(&c);
            b.step(&c);
            changes += before.iter().zip(&a.glyphs).filter(|(x, y)| x != y).count();
            assert!(a.glyphs.iter().all(|g| BINARY.contains(*g)));
        }
        assert_eq!(a, b);
        // 2000 frames * 26 glyphs * 0.35% ≈ 182 hits, about half change the binary glyph
        assert!(changes > 20 && changes < 400, "changes {changes}");
    }

    #[test]
    fn column_count_follows_width_and_is_at_least_one() {
        assert_eq!(RainField::column_count(Viewport::new(800, 600), 20.0), 40);
        assert_eq!(RainField::column_count(Viewport::new(5, 600), 20.0), 1);
        assert_eq!(RainField::column_count(Viewport::new(800, 600), 0.0), 800);
    }

    #[test]
    fn reductions_match_serial_computation() {
        let mut rng = session_rng(Some(21));
        let field = RainField::new(&spawn(Viewport::new(1280, 720)), &mut rng);
        let stats = field.stats();
        assert_eq!(stats.columns, 64);
        let serial_max = field.drops.iter().map(|d| d.glyphs.len()).max().unwrap();
        let serial_sum: usize = field.drops.iter().map(|d| d.glyphs.len()).sum();
        assert_eq!(stats.max_tail, serial_max);
        assert_eq!(stats.total_glyphs, serial_sum);
        assert!((MIN_GLYPHS..=MAX_GLYPHS).contains(&stats.max_tail));
    }

    #[test]
    fn resize_regenerates_columns() {
        let mut rng = session_rng(Some(9));
        let mut field = RainField::new(&spawn(Viewport::new(800, 600)), &mut rng);
        assert_eq!(field.drops.len(), 40);
        field.resize(&spawn(Viewport::new(400, 240)), &mut rng);
        assert_eq!(field.drops.len(), 20);
        assert_eq!(field.dashes.len(), 2);
    }

    #[test]
    fn emitted_glyphs_are_on_screen() {
        let vp = Viewport::new(800, 600);
        let mut rng = session_rng(Some(13));
        let field = RainField::new(&spawn(vp), &mut rng);
        let mut out = Vec::new();
        field.emit(&ctx(vp, 0.0, 1.0, 0), &mut out);
        assert!(!out.is_empty());
        assert!(out.iter().all(|g| g.position.y >= -20.0 && g.position.y <= 600.0));
    }
}
