//! gesture_dino — game entry point.

use anyhow::Context;
use dino_world::{EndReason, Tuning};
use gesture_dino::app::run;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║        Gesture Dino — open hand jumps, fist ducks    ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!();

    let outcome = run(Tuning::default()).context("gesture dino could not start")?;

    let how = match outcome.reason {
        EndReason::Collision => "crashed",
        EndReason::Quit      => "quit",
    };
    info!(score = outcome.score, "exiting");
    println!("  Game over ({}) — score {}", how, outcome.score);
    println!();
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
