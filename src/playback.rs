//! Playback clock and the per-tick redraw driver.
//!
//! The driver never subscribes to the clock. The event loop calls
//! [`PlaybackDriver::tick`] on every iteration and only resolves and redraws
//! when the sampled time moved, so a paused clock costs nothing.

use std::time::Instant;

use crate::hierarchy::Timeline;

/// Seconds of video shown before the first test starts in an export.
pub const LEAD_IN_SECS: f64 = 10.0;

/// Seconds of video kept after the last logged event.
pub const TAIL_SECS: f64 = 10.0;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of video time samples, in seconds.
pub trait Clock {
    fn current_time(&self) -> f64;
}

/// A simulated video clock for terminal playback.
///
/// Runs from `0` to `duration` at real-time speed while playing and holds
/// still when paused or finished.
#[derive(Debug, Clone)]
pub struct MediaClock {
    duration: f64,
    /// Position at `anchor`.
    position: f64,
    /// Set while playing.
    anchor: Option<Instant>,
}

impl MediaClock {
    /// A paused clock at position 0.
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            position: 0.0,
            anchor: None,
        }
    }

    /// Video length covering the whole run plus its lead-in and tail.
    pub fn duration_for(timeline: &Timeline, offset: f64) -> f64 {
        offset + timeline.run_length() / 1000.0 + TAIL_SECS
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.anchor.is_some()
    }

    /// Position at `now`. Split out from [`Clock::current_time`] so tests
    /// can pin the instant.
    pub fn time_at(&self, now: Instant) -> f64 {
        match self.anchor {
            Some(anchor) => {
                let elapsed = now.saturating_duration_since(anchor).as_secs_f64();
                (self.position + elapsed).min(self.duration)
            }
            None => self.position,
        }
    }

    pub fn play_at(&mut self, now: Instant) {
        if self.anchor.is_none() {
            self.anchor = Some(now);
        }
    }

    pub fn pause_at(&mut self, now: Instant) {
        self.position = self.time_at(now);
        self.anchor = None;
    }

    pub fn toggle_at(&mut self, now: Instant) {
        if self.is_playing() {
            self.pause_at(now);
        } else {
            self.play_at(now);
        }
    }

    /// Jump to `secs`, clamped to `[0, duration]`. Play state is kept.
    pub fn seek_at(&mut self, secs: f64, now: Instant) {
        self.position = secs.clamp(0.0, self.duration);
        if self.anchor.is_some() {
            self.anchor = Some(now);
        }
    }

    /// Move by `delta` seconds relative to the current position.
    pub fn seek_by_at(&mut self, delta: f64, now: Instant) {
        let target = self.time_at(now) + delta;
        self.seek_at(target, now);
    }

    pub fn play(&mut self) {
        self.play_at(Instant::now());
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn toggle(&mut self) {
        self.toggle_at(Instant::now());
    }

    pub fn seek(&mut self, secs: f64) {
        self.seek_at(secs, Instant::now());
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.seek_by_at(delta, Instant::now());
    }
}

impl Clock for MediaClock {
    fn current_time(&self) -> f64 {
        self.time_at(Instant::now())
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Remembers the previous clock sample.
#[derive(Debug, Default)]
pub struct PlaybackDriver {
    last_sample: Option<f64>,
}

impl PlaybackDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the clock. Returns the new time only when it differs from the
    /// previous tick's sample.
    pub fn tick<C: Clock + ?Sized>(&mut self, clock: &C) -> Option<f64> {
        let now = clock.current_time();
        if self.last_sample == Some(now) {
            return None;
        }
        self.last_sample = Some(now);
        Some(now)
    }

    /// Forget the previous sample so the next tick always fires.
    pub fn invalidate(&mut self) {
        self.last_sample = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
