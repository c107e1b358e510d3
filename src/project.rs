//! Loading a recorded test run from disk.
//!
//! A project is identified by a path prefix `P`. Its event log lives in
//! `P.log` and its overlay config in `P.toml`:
//!
//! ```toml
//! offset = 3.25          # video seconds at which the first test starts
//! slice = 1              # leading path segments to hide
//! title = ["My app", "nightly e2e"]
//! ```
//!
//! Every field is required. Any failure here is fatal: the row sequence
//! cannot be trusted if either input is incomplete.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use serde::Deserialize;

use crate::event_log::{check_ordering, parse_log, LogError, OrderingIssue};
use crate::hierarchy::{build, Timeline};
use crate::overlay::{self, Appearance, OverlayView};
use crate::resolver::{resolve, Snapshot};

// ---------------------------------------------------------------------------
// Project config
// ---------------------------------------------------------------------------

/// Per-recording overlay settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectConfig {
    /// Video time (seconds) that lines up with the first test's start.
    pub offset: f64,
    /// Number of leading path segments to drop.
    pub slice: usize,
    /// Static lines drawn at the top of the overlay.
    pub title: Vec<String>,
}

/// Parse the contents of a `P.toml` file.
pub fn parse_project_config(text: &str) -> Result<ProjectConfig, toml::de::Error> {
    toml::from_str(text)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum LoadError {
    /// A project file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The event log contains a malformed line.
    Log { path: PathBuf, source: LogError },
    /// The project config is malformed or missing a field.
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "could not read {}: {}", path.display(), source)
            }
            LoadError::Log { path, source } => write!(f, "{}: {}", path.display(), source),
            LoadError::Config { path, source } => {
                write!(f, "invalid project config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Log { source, .. } => Some(source),
            LoadError::Config { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A fully loaded recording: config plus the row sequence built from its log.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: ProjectConfig,
    pub timeline: Timeline,
    /// Places where log times go backwards. Reported, never corrected.
    pub ordering_issues: Vec<OrderingIssue>,
}

impl Project {
    /// Build a project from already-loaded inputs.
    pub fn from_parts(config: ProjectConfig, log_text: &str) -> Result<Self, LogError> {
        let events = parse_log(log_text)?;
        let ordering_issues = check_ordering(&events);
        let timeline = build(&events, config.slice);
        Ok(Self {
            config,
            timeline,
            ordering_issues,
        })
    }

    /// Log time (ms) at video time `video_secs`.
    pub fn log_time(&self, video_secs: f64) -> f64 {
        self.timeline.log_time(video_secs, self.config.offset)
    }

    /// Resolve the overlay state at video time `video_secs`.
    pub fn snapshot_at(&self, video_secs: f64) -> Snapshot {
        resolve(&self.timeline.rows, self.log_time(video_secs))
    }

    /// Paint the overlay for `snapshot`. Shared by playback and export.
    pub fn draw(&self, buf: &mut Buffer, area: Rect, snapshot: &Snapshot, appearance: &Appearance) {
        let view = OverlayView {
            timeline: &self.timeline,
            title: &self.config.title,
            snapshot,
            theme: &appearance.theme,
            symbols: &appearance.symbols,
            rows_to_show: appearance.rows_to_show,
        };
        overlay::render(buf, area, &view);
    }
}

/// `P` + `ext`, without replacing anything already after a dot in `P`.
fn sibling(prefix: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

pub fn log_path(prefix: &Path) -> PathBuf {
    sibling(prefix, "log")
}

pub fn config_path(prefix: &Path) -> PathBuf {
    sibling(prefix, "toml")
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `P.toml` and `P.log` and build the row sequence.
pub fn load_project(prefix: &Path) -> Result<Project, LoadError> {
    let config_file = config_path(prefix);
    let config = parse_project_config(&read(&config_file)?).map_err(|source| {
        LoadError::Config {
            path: config_file.clone(),
            source,
        }
    })?;

    let log_file = log_path(prefix);
    let log_text = read(&log_file)?;
    Project::from_parts(config, &log_text).map_err(|source| LoadError::Log {
        path: log_file,
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
