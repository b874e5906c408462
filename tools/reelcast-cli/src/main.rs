//! Reelcast CLI — render recording sessions from the command line.
//!
//! Usage:
//!   reelcast render [OPTIONS]     Compose a frame sequence
//!   reelcast validate [OPTIONS]   Check a cursor track and effect config
//!   reelcast info [OPTIONS]       Summarize a session

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use reelcast_common::config::AppConfig;
use reelcast_common::logging;

mod commands;

#[derive(Parser)]
#[command(
    name = "reelcast",
    about = "Cursor overlay, background framing and zoom for screen recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/reelcast/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// The two documents recorded next to a capture.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Cursor track JSON
    #[arg(long)]
    pub cursor_data: PathBuf,

    /// Effect configuration JSON
    #[arg(long)]
    pub zoom_config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose every frame of an image sequence
    Render {
        #[command(flatten)]
        session: SessionArgs,

        /// Directory of decoded source frames (PNG or JPEG)
        #[arg(long)]
        frames: PathBuf,

        /// Output directory for composed frames
        #[arg(short, long)]
        output: PathBuf,

        /// Video frame rate
        #[arg(long)]
        fps: Option<f64>,

        /// Cursor artwork directory
        #[arg(long)]
        sprites: Option<PathBuf>,

        /// Stop after this many frames
        #[arg(long)]
        max_frames: Option<u64>,
    },

    /// Check a session's documents without rendering
    Validate {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Show session information
    Info {
        #[command(flatten)]
        session: SessionArgs,

        /// Video frame rate
        #[arg(long)]
        fps: Option<f64>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let mut log_config = config.logging.clone();
    if cli.verbose {
        log_config.level = logging::level_for_verbosity(true).to_string();
    }
    logging::init_logging(&log_config);

    match cli.command {
        Commands::Render {
            session,
            frames,
            output,
            fps,
            sprites,
            max_frames,
        } => commands::render::run(&config, session, frames, output, fps, sprites, max_frames),
        Commands::Validate { session } => commands::validate::run(session),
        Commands::Info { session, fps, json } => {
            commands::info::run(session, fps.unwrap_or(config.render.fallback_fps), json)
        }
    }
}
