//! Application state for the TUI player.
//!
//! The [`App`] struct owns the loaded project, the simulated video clock and
//! the last resolved [`Snapshot`]. Key handlers only move the clock; the
//! overlay state is recomputed from the clock in [`App::on_tick`], so a seek
//! and normal playback go through the same path.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cli::PlayArgs;
use crate::config::AppConfig;
use crate::overlay::Appearance;
use crate::playback::{MediaClock, PlaybackDriver};
use crate::project::Project;
use crate::resolver::Snapshot;

/// Seconds moved by a plain arrow key.
pub const SMALL_STEP_SECS: f64 = 1.0;

/// Seconds moved by a shifted arrow key.
pub const LARGE_STEP_SECS: f64 = 10.0;

// ---------------------------------------------------------------------------
// App struct
// ---------------------------------------------------------------------------

/// Root application state.
///
/// Single-owner, never shared across threads. The event loop owns the
/// `App` and passes a `&mut` reference to key handlers and the draw
/// function.
pub struct App {
    /// The recording being played.
    pub project: Project,
    /// Theme, glyphs and window size for the overlay.
    pub appearance: Appearance,
    /// Simulated video clock.
    pub clock: MediaClock,
    driver: PlaybackDriver,
    /// Video time of the last resolved snapshot, in seconds.
    pub video_time: f64,
    /// Overlay state at `video_time`.
    pub snapshot: Snapshot,
    /// Set to `true` to exit the event loop.
    pub should_quit: bool,
    /// Set whenever something visible changed since the last draw.
    pub needs_redraw: bool,
}

impl App {
    /// Create an `App` positioned at `args.start`, playing unless
    /// `args.paused` is set.
    pub fn new(project: Project, config: &AppConfig, args: &PlayArgs) -> Self {
        let mut clock = MediaClock::new(MediaClock::duration_for(
            &project.timeline,
            project.config.offset,
        ));
        clock.seek(args.start);
        if !args.paused {
            clock.play();
        }

        let video_time = args.start.clamp(0.0, clock.duration());
        let snapshot = project.snapshot_at(video_time);
        Self {
            project,
            appearance: Appearance::from_config(config),
            clock,
            driver: PlaybackDriver::new(),
            video_time,
            snapshot,
            should_quit: false,
            needs_redraw: true,
        }
    }

    // -- Tick ----------------------------------------------------------------

    /// Sample the clock and re-resolve the overlay if time moved.
    pub fn on_tick(&mut self) {
        if let Some(t) = self.driver.tick(&self.clock) {
            self.set_video_time(t);
        }
    }

    fn set_video_time(&mut self, t: f64) {
        self.video_time = t;
        self.snapshot = self.project.snapshot_at(t);
        self.needs_redraw = true;
    }

    // -- Key handling --------------------------------------------------------

    /// Handle a key event, dispatching to the appropriate action.
    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') | KeyCode::Char('k') => self.toggle_play(),
            KeyCode::Left if shifted => self.seek_by(-LARGE_STEP_SECS),
            KeyCode::Right if shifted => self.seek_by(LARGE_STEP_SECS),
            KeyCode::Left | KeyCode::Char('h') => self.seek_by(-SMALL_STEP_SECS),
            KeyCode::Right | KeyCode::Char('l') => self.seek_by(SMALL_STEP_SECS),
            KeyCode::Char('H') => self.seek_by(-LARGE_STEP_SECS),
            KeyCode::Char('L') => self.seek_by(LARGE_STEP_SECS),
            KeyCode::Home | KeyCode::Char('g') => self.seek_to(0.0),
            KeyCode::End | KeyCode::Char('G') => self.seek_to(self.clock.duration()),
            _ => {}
        }
    }

    // -- Transport -----------------------------------------------------------

    pub fn toggle_play(&mut self) {
        self.clock.toggle();
        self.needs_redraw = true;
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.clock.seek_by(delta);
        self.driver.invalidate();
        self.on_tick();
    }

    pub fn seek_to(&mut self, secs: f64) {
        self.clock.seek(secs);
        self.driver.invalidate();
        self.on_tick();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
