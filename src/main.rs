use std::fs;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use matrix_fx::config::{CliArgs, EngineConfig};
use matrix_fx::engine::{AnimationEngine, run_headless};
use matrix_fx::render::RecordingSurface;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Init tracing
    let filter = if args.verbose {
        EnvFilter::new("matrix_fx=debug")
    } else {
        EnvFilter::new("matrix_fx=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config: EngineConfig = args.into();
    if let Err(e) = config.validate() {
        error!(%e, "Invalid configuration");
        return Err(anyhow::anyhow!(e)).context("matrix-fx configuration rejected");
    }

    // Configure rayon thread pool
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    let mut engine = AnimationEngine::new(&config, config.viewport);
    let mut surface = RecordingSurface::new();
    let summary = run_headless(
        &mut engine,
        &mut surface,
        config.frames,
        config.dt,
        config.threads,
    );

    if let Some(path) = &config.summary {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!(path = %path.display(), "Wrote run summary");
    }

    println!(
        "Done: {} frames, {} {} ({} entities) at {:.1} fps",
        summary.frames, summary.mode, summary.exec, summary.entities, summary.fps
    );
    Ok(())
}
