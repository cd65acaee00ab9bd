use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use power_snake::game::{Difficulty, GameConfig, FPS};
use power_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "power_snake")]
#[command(version, about = "Snake with power-ups and difficulty tiers")]
struct Cli {
    /// Start at this difficulty instead of showing the menu
    #[arg(long)]
    difficulty: Option<DifficultyArg>,

    /// Render frames per second
    #[arg(long, default_value_t = FPS)]
    fps: u32,

    /// Seed for food and power-up placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Beginner,
    Recommended,
    Expert,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Beginner => Difficulty::Beginner,
            DifficultyArg::Recommended => Difficulty::Recommended,
            DifficultyArg::Expert => Difficulty::Expert,
        }
    }
}

/// The terminal belongs to the game, so logs only go to a file when asked
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    // Create game configuration from CLI arguments
    let config = GameConfig {
        fps: cli.fps,
        difficulty: cli.difficulty.map(Difficulty::from),
        seed: cli.seed,
    };
    tracing::info!(?config, "starting");

    let mut human_mode = HumanMode::new(config);
    human_mode.run().await?;

    Ok(())
}
