//! Event handling for the TUI event loop.
//!
//! Wraps crossterm key/resize events into a single [`AppEvent`] enum that
//! the main loop can `match` on. Timeouts become [`AppEvent::Tick`], which
//! is what advances playback.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

// ---------------------------------------------------------------------------
// AppEvent
// ---------------------------------------------------------------------------

/// Events consumed by the TUI event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input arrived within the poll timeout.
    Tick,
}

// ---------------------------------------------------------------------------
// Event polling
// ---------------------------------------------------------------------------

/// Poll for the next crossterm event with the given timeout.
///
/// Returns [`AppEvent::Tick`] on timeout and `None` for events the player
/// ignores (mouse, focus, paste, key releases). Blocking; call it from the
/// main thread.
pub fn poll_crossterm_event(timeout: Duration) -> Option<AppEvent> {
    if !event::poll(timeout).ok()? {
        return Some(AppEvent::Tick);
    }
    translate(event::read().ok()?)
}

fn translate(event: CrosstermEvent) -> Option<AppEvent> {
    match event {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Some(AppEvent::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
