use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Replay a recorded test run as a synchronized timeline overlay
#[derive(Parser, Debug)]
#[command(
    name = "testreel",
    about = "Replay a recorded test run as a synchronized timeline overlay"
)]
pub struct Cli {
    /// Path prefix of the recording. testreel reads <PROJECT>.log
    /// (event log) and <PROJECT>.toml (offset, slice, title).
    #[arg(long)]
    pub project: PathBuf,

    /// Write diagnostics (effective config, load summary, ordering
    /// warnings) to stderr.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Color theme: dark or light
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Use ASCII glyphs instead of Unicode symbols
    #[arg(long, default_value_t = false)]
    pub ascii: bool,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive playback in the terminal (the default)
    Play(PlayArgs),
    /// Render frames at a fixed frame rate into a directory
    Export(ExportArgs),
    /// Print frame size, rate and count as JSON
    Info,
    /// Print the reconstructed rows as JSON
    Rows,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct PlayArgs {
    /// Video time (seconds) to start playback at
    #[arg(long, default_value_t = 0.0)]
    pub start: f64,

    /// Start paused instead of playing
    #[arg(long, default_value_t = false)]
    pub paused: bool,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            start: 0.0,
            paused: false,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ExportArgs {
    /// Directory to write frame-NNNNNN.txt files into
    #[arg(long)]
    pub out: PathBuf,

    /// First frame to render (inclusive)
    #[arg(long)]
    pub from: Option<u64>,

    /// Last frame to render (exclusive). Defaults to the frame count.
    #[arg(long)]
    pub to: Option<u64>,

    /// Frame width in cells
    #[arg(long)]
    pub width: Option<u16>,

    /// Frame height in cells
    #[arg(long)]
    pub height: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}
