#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Odd One Out headlessly.
//!
//! The binary wires the session to the countdown and autoplay systems, feeds
//! them simulated frame time and narrates every notification through `log`.

mod presenter;
mod settings;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use oddone_core::{DifficultyTier, WELCOME_BANNER};
use oddone_session::{GameSession, SessionConfig};
use oddone_system_autoplay::{Autoplay, Config as AutoplayConfig};

use crate::{
    presenter::LoggingPresenter,
    simulation::{run, Simulation},
};

#[derive(Parser, Debug)]
#[command(version, about = "Headless Odd One Out simulation", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Session configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Difficulty tier: children, easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<DifficultyTier>,

    /// Seed for field generation; numbers are used as-is, text is hashed
    #[arg(short, long)]
    seed: Option<String>,

    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Probability that the simulated player finds the unusual cell
    #[arg(long, default_value_t = 0.8)]
    accuracy: f64,

    /// Time the simulated player looks at a field before tapping
    #[arg(long, default_value_t = 600)]
    reaction_ms: u64,

    /// Simulated frame length
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Frames after which a running game is stopped
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_frames: u64,
}

/// Entry point for the Odd One Out command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut config = match &args.config {
        Some(path) => settings::load_config(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = &args.seed {
        config = config.with_seed(settings::resolve_seed(seed));
    }
    log::debug!("seed: {:#x}", config.seed);

    let frame = Duration::from_millis(args.frame_ms.max(1));
    let autoplay_config = AutoplayConfig::new(
        args.accuracy,
        Duration::from_millis(args.reaction_ms),
        config.seed,
    );

    println!("{WELCOME_BANNER}");
    let mut session = GameSession::with_config(config);
    let mut autoplay = Autoplay::new(autoplay_config);
    let mut presenter = LoggingPresenter::default();
    let summaries = run(
        Simulation {
            games: args.games,
            frame,
            max_frames: args.max_frames,
            difficulty: args.difficulty,
        },
        &mut session,
        &mut autoplay,
        &mut presenter,
    )
    .context("simulation aborted")?;

    for (index, summary) in summaries.iter().enumerate() {
        println!(
            "game {}: {:?} at level {}, score {}, high score {}",
            index + 1,
            summary.reason,
            summary.level,
            summary.score,
            summary.high_score
        );
    }

    Ok(())
}
