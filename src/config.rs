use std::path::PathBuf;

use clap::Parser;

use crate::error::{FxError, Result};
use crate::mesh::{ProjectionKind, TopologyKind};
use crate::motion::{Execution, MotionMode};
use crate::types::{Alphabet, Viewport};

/// Accepted window side length, in pixels.
pub const MIN_SIDE: u32 = 160;
pub const MAX_SIDE: u32 = 10_000;
pub const MAX_COUNT: usize = 200_000;
pub const MAX_THREADS: u64 = 1024;

/// A bare positional argument: either a glyph count or a `WxH` size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positional {
    Count(usize),
    Resolution(Viewport),
}

/// Parse `WIDTHxHEIGHT`, each side in `160..=10000`.
pub fn parse_resolution(s: &str) -> std::result::Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let side = |v: &str| -> std::result::Result<u32, String> {
        let n: u32 = v
            .trim()
            .parse()
            .map_err(|_| format!("invalid dimension '{v}' in '{s}'"))?;
        if !(MIN_SIDE..=MAX_SIDE).contains(&n) {
            return Err(format!("dimension {n} outside {MIN_SIDE}..={MAX_SIDE}"));
        }
        Ok(n)
    };
    Ok(Viewport::new(side(w)?, side(h)?))
}

fn parse_positional(s: &str) -> std::result::Result<Positional, String> {
    if s.contains(['x', 'X']) {
        return parse_resolution(s).map(Positional::Resolution);
    }
    let n: usize = s
        .parse()
        .map_err(|_| format!("expected a glyph count or WIDTHxHEIGHT, got '{s}'"))?;
    if !(1..=MAX_COUNT).contains(&n) {
        return Err(format!("glyph count {n} outside 1..={MAX_COUNT}"));
    }
    Ok(Positional::Count(n))
}

/// Fully resolved engine configuration (constructed from CLI args).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Glyph count for the particle modes; rain derives its own.
    pub count: usize,
    pub viewport: Viewport,
    pub mode: MotionMode,
    pub execution: Execution,
    pub threads: Option<usize>,
    pub glyph_size: f32,
    pub speed: f32,
    pub alphabet: Alphabet,
    pub model_path: Option<PathBuf>,
    pub style: TopologyKind,
    pub projection: ProjectionKind,
    pub flip_yz: bool,
    pub frames: u64,
    /// Fixed frame step of the headless run, seconds.
    pub dt: f32,
    pub seed: Option<u64>,
    pub summary: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            count: 200,
            viewport: Viewport::default(),
            mode: MotionMode::default(),
            execution: Execution::default(),
            threads: None,
            glyph_size: 20.0,
            speed: 1.0,
            alphabet: Alphabet::default(),
            model_path: None,
            style: TopologyKind::default(),
            projection: ProjectionKind::default(),
            flip_yz: true,
            frames: 600,
            dt: 1.0 / 60.0,
            seed: None,
            summary: None,
            verbose: false,
        }
    }
}

impl EngineConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(FxError::Config("glyph count must be at least 1".into()));
        }
        if !(self.glyph_size.is_finite() && self.glyph_size >= 1.0) {
            return Err(FxError::Config(format!(
                "glyph size must be at least 1 px, got {}",
                self.glyph_size
            )));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(FxError::Config(format!(
                "speed must be a non-negative number, got {}",
                self.speed
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(FxError::Config(format!("dt must be positive, got {}", self.dt)));
        }
        if let Some(threads) = self.threads {
            if !(1..=MAX_THREADS as usize).contains(&threads) {
                return Err(FxError::Config(format!(
                    "thread count {threads} outside 1..={MAX_THREADS}"
                )));
            }
        }
        Ok(())
    }
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "matrix-fx",
    about = "Matrix-style glyph animation with a projected 3D mesh overlay",
    version
)]
pub struct CliArgs {
    /// Glyph count and/or window size (WxH), in either order
    #[arg(value_parser = parse_positional, num_args = 0..=2, value_name = "N|WxH")]
    pub positional: Vec<Positional>,

    /// Motion mode
    #[arg(short = 'm', long, value_enum, default_value = "rain")]
    pub mode: MotionMode,

    /// Run every update pass on the calling thread
    #[arg(long)]
    pub seq: bool,

    /// Worker thread count (default: all cores)
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u64).range(1..=MAX_THREADS))]
    pub threads: Option<u64>,

    /// Glyph size in pixels
    #[arg(long, default_value_t = 20.0)]
    pub glyph_size: f32,

    /// Global animation speed multiplier
    #[arg(long, default_value_t = 1.0)]
    pub speed: f32,

    /// Glyph alphabet
    #[arg(long, value_enum, default_value = "binary")]
    pub alphabet: Alphabet,

    /// OBJ mesh drawn over the glyphs
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Mesh style: wire or solid
    #[arg(long, value_enum, default_value = "wire")]
    pub style: TopologyKind,

    /// Mesh projection: yaw or autofit
    #[arg(long, value_enum, default_value = "yaw")]
    pub projection: ProjectionKind,

    /// Keep the mesh's source Y/Z orientation
    #[arg(long)]
    pub no_flip: bool,

    /// Frames to run
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Fixed frame step in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl From<CliArgs> for EngineConfig {
    fn from(args: CliArgs) -> Self {
        let defaults = EngineConfig::default();
        let mut count = defaults.count;
        let mut viewport = defaults.viewport;
        for p in &args.positional {
            match *p {
                Positional::Count(n) => count = n,
                Positional::Resolution(v) => viewport = v,
            }
        }
        // Never more glyphs than pixels
        let count = count.min(usize::try_from(viewport.area()).unwrap_or(usize::MAX));

        EngineConfig {
            count,
            viewport,
            mode: args.mode,
            execution: if args.seq {
                Execution::Sequential
            } else {
                Execution::Parallel
            },
            threads: args.threads.map(|t| t as usize),
            glyph_size: args.glyph_size,
            speed: args.speed,
            alphabet: args.alphabet,
            model_path: args.model,
            style: args.style,
            projection: args.projection,
            flip_yz: !args.no_flip,
            frames: args.frames,
            dt: args.dt,
            seed: args.seed,
            summary: args.summary,
            verbose: args.verbose,
        }
    }
}
