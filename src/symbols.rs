//! Symbol set for overlay rendering.
//!
//! Unicode mode uses prettier glyphs; ASCII mode uses basic characters
//! for better compatibility with terminals that lack Unicode support.

use crate::hierarchy::Outcome;

// ---------------------------------------------------------------------------
// Symbols struct
// ---------------------------------------------------------------------------

/// Symbol set for overlay rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbols {
    /// Passed test glyph (Unicode: `\u{2714}` / ASCII: `+`)
    pub passed: &'static str,
    /// Failed test glyph (Unicode: `\u{2718}` / ASCII: `x`)
    pub failed: &'static str,
    /// Pending or unknown outcome glyph.
    pub other: &'static str,
    /// Appended to truncated text (Unicode: `\u{2026}` / ASCII: `...`)
    pub ellipsis: &'static str,
    /// Status bar marker while the clock runs.
    pub playing: &'static str,
    /// Status bar marker while the clock is paused.
    pub paused: &'static str,
}

impl Symbols {
    /// Create a new `Symbols` based on the mode flag.
    pub fn new(ascii_mode: bool) -> Self {
        if ascii_mode {
            Self::ascii()
        } else {
            Self::unicode()
        }
    }

    pub fn unicode() -> Self {
        Self {
            passed: "\u{2714}",  // ✔
            failed: "\u{2718}",  // ✘
            other: "-",
            ellipsis: "\u{2026}", // …
            playing: "\u{25b6}",  // ▶
            paused: "\u{2016}",   // ‖
        }
    }

    pub fn ascii() -> Self {
        Self {
            passed: "+",
            failed: "x",
            other: "-",
            ellipsis: "...",
            playing: ">",
            paused: "||",
        }
    }

    /// Glyph shown in the right column of a finished test.
    pub fn outcome(&self, outcome: Option<Outcome>) -> &'static str {
        match outcome {
            Some(Outcome::Passed) => self.passed,
            Some(Outcome::Failed) => self.failed,
            _ => self.other,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
