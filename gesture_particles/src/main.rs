//! gesture_particles — interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gesture_particles::app::{run, SourceKind};
use gesture_particles::config::AppConfig;

/// Hand-gesture controlled particle cloud.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON config file; created with defaults if missing.
    #[arg(long, default_value = "gesture_particles.json")]
    config: PathBuf,

    /// Play hand frames from a JSON-lines recording instead of the simulated hand.
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Restart the recording when it ends.
    #[arg(long = "loop", requires = "replay")]
    loop_replay: bool,

    /// Template shown at startup (sphere, heart, flower, saturn, firework).
    #[arg(long)]
    template: Option<String>,

    /// Number of particles.
    #[arg(long)]
    particles: Option<usize>,

    /// Seed for the firework scatter.
    #[arg(long)]
    seed: Option<u64>,

    /// Don't write a default config file.
    #[arg(long)]
    quick: bool,

    /// Track a real hand with a LeapMotion controller.
    #[cfg(feature = "leap")]
    #[arg(long, conflicts_with = "replay")]
    leap: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Gesture Particles — hand-steered particle cloud       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config_existed = args.config.exists();
    let mut cfg = AppConfig::load(&args.config)?;
    if !config_existed && !args.quick {
        cfg.save(&args.config)
            .with_context(|| format!("writing default config to {}", args.config.display()))?;
        tracing::info!("wrote default config to {}", args.config.display());
    }

    if let Some(name) = args.template.clone() { cfg.initial_template = name; }
    if let Some(n)    = args.particles  { cfg.morph.count = n.max(1); }
    if let Some(seed) = args.seed       { cfg.seed = Some(seed); }
    if args.loop_replay                 { cfg.source.loop_replay = true; }

    let source = select_source(&args);
    match &source {
        SourceKind::Simulated    => println!("  Mode: Keyboard simulation  (arrows, Z/X, Space, H; Q quits)"),
        SourceKind::Replay(path) => println!("  Mode: Replay {}", path.display()),
        #[cfg(feature = "leap")]
        SourceKind::Leap         => println!("  Mode: LeapMotion hardware"),
    }
    println!();

    run(cfg, source).context("gesture_particles failed")
}

fn select_source(args: &Args) -> SourceKind {
    #[cfg(feature = "leap")]
    if args.leap {
        return SourceKind::Leap;
    }
    match &args.replay {
        Some(path) => SourceKind::Replay(path.clone()),
        None       => SourceKind::Simulated,
    }
}
