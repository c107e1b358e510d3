//! Theme support for the overlay.
//!
//! [`ThemeColors`] holds every color the overlay and the playback status
//! bar paint with. Two palettes exist: [`ThemeColors::dark()`] (default)
//! and [`ThemeColors::light()`]. All colors use the 16 basic ANSI palette
//! for maximum terminal compatibility.

use ratatui::style::Color;

use crate::cli::Theme;
use crate::hierarchy::{Outcome, TimerPhase};

// ---------------------------------------------------------------------------
// ThemeColors
// ---------------------------------------------------------------------------

/// All color definitions, grouped by overlay region.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    // -- Canvas ------------------------------------------------------------
    /// Overlay background.
    pub background: Color,
    /// Static title lines.
    pub title: Color,

    // -- Rows --------------------------------------------------------------
    /// Default row text.
    pub row_text: Color,
    /// Background of a running test row.
    pub running_bg: Color,
    /// Elapsed portion of a running test row.
    pub progress_bg: Color,
    /// Background of the active slot when nothing is running in it.
    pub active_bg: Color,
    /// Elapsed-duration column.
    pub duration: Color,
    pub passed: Color,
    pub failed: Color,
    pub pending: Color,
    /// Finished test whose outcome could not be decoded.
    pub unknown_outcome: Color,

    // -- Footer ------------------------------------------------------------
    /// "Test N of M" label.
    pub counter: Color,
    /// Run timer before the first test starts.
    pub timer_before: Color,
    /// Run timer while the run is in progress.
    pub timer_running: Color,
    /// Run timer after the last event.
    pub timer_after: Color,
    /// Word-wrapped headline of the active row.
    pub headline: Color,

    // -- Status bar --------------------------------------------------------
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_shortcut_key: Color,
}

impl ThemeColors {
    /// Construct the theme colors from the CLI/config theme enum.
    pub fn from_theme(theme: &Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Black,
            title: Color::Gray,

            row_text: Color::White,
            running_bg: Color::Blue,
            progress_bg: Color::LightBlue,
            active_bg: Color::DarkGray,
            duration: Color::Gray,
            passed: Color::LightGreen,
            failed: Color::LightRed,
            pending: Color::LightMagenta,
            unknown_outcome: Color::White,

            counter: Color::Gray,
            timer_before: Color::Gray,
            timer_running: Color::LightGreen,
            timer_after: Color::LightYellow,
            headline: Color::White,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_shortcut_key: Color::Yellow,
        }
    }

    /// Light theme -- adjusted for readability on light terminal
    /// backgrounds.
    pub fn light() -> Self {
        Self {
            background: Color::White,
            title: Color::DarkGray,

            row_text: Color::Black,
            running_bg: Color::LightBlue,
            progress_bg: Color::Cyan,
            active_bg: Color::Gray,
            duration: Color::DarkGray,
            passed: Color::Green,
            failed: Color::Red,
            pending: Color::Magenta,
            unknown_outcome: Color::Black,

            counter: Color::DarkGray,
            timer_before: Color::DarkGray,
            timer_running: Color::Green,
            timer_after: Color::Yellow,
            headline: Color::Black,

            status_bar_bg: Color::Gray,
            status_bar_fg: Color::Black,
            status_shortcut_key: Color::Blue,
        }
    }

    /// Text color of a finished test.
    pub fn outcome(&self, outcome: Option<Outcome>) -> Color {
        match outcome {
            Some(Outcome::Passed) => self.passed,
            Some(Outcome::Failed) => self.failed,
            Some(Outcome::Pending) => self.pending,
            Some(Outcome::Unknown) | None => self.unknown_outcome,
        }
    }

    pub fn timer(&self, phase: TimerPhase) -> Color {
        match phase {
            TimerPhase::BeforeRun => self.timer_before,
            TimerPhase::Running => self.timer_running,
            TimerPhase::AfterRun => self.timer_after,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_theme_differs_from_dark() {
        let dark = ThemeColors::dark();
        let light = ThemeColors::light();
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.row_text, light.row_text);
        assert_ne!(dark.status_bar_bg, light.status_bar_bg);
    }

    #[test]
    fn test_from_theme() {
        assert_eq!(ThemeColors::from_theme(&Theme::Dark), ThemeColors::dark());
        assert_eq!(ThemeColors::from_theme(&Theme::Light), ThemeColors::light());
    }

    #[test]
    fn test_outcome_colors_are_distinct() {
        let t = ThemeColors::dark();
        assert_ne!(t.outcome(Some(Outcome::Passed)), t.outcome(Some(Outcome::Failed)));
        assert_ne!(t.outcome(Some(Outcome::Failed)), t.outcome(Some(Outcome::Pending)));
        // Unknown outcomes are unstyled: same as plain row text.
        assert_eq!(t.outcome(Some(Outcome::Unknown)), t.row_text);
    }

    #[test]
    fn test_timer_colors_follow_phase() {
        let t = ThemeColors::dark();
        assert_eq!(t.timer(TimerPhase::BeforeRun), t.timer_before);
        assert_eq!(t.timer(TimerPhase::Running), t.timer_running);
        assert_eq!(t.timer(TimerPhase::AfterRun), t.timer_after);
    }
}
