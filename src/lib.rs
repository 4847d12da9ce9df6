pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod mesh;
pub mod motion;
pub mod render;
pub mod rng;
pub mod types;

pub use config::{CliArgs, EngineConfig};
pub use engine::{AnimationEngine, RunSummary, run_headless};
pub use error::{FxError, Result};
pub use render::{RecordingSurface, Surface};
