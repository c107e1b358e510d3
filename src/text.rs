//! Text fitting and time formatting for the overlay.
//!
//! Widths are measured through a caller-supplied function so the fitting
//! logic does not care whether the unit is pixels or terminal cells. Both
//! algorithms assume the measure is monotonic in prefix length.

use ratatui::text::Span;

/// Display width of `text` in terminal cells.
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Fit `text` into `max_width`, cutting it and appending `ellipsis` when it
/// does not fit.
///
/// Binary search over character count for the longest trimmed prefix that
/// still fits with the ellipsis attached. When not even the ellipsis fits
/// the bare ellipsis is returned and the caller clips it.
pub fn truncate_to_width<F>(text: &str, max_width: usize, ellipsis: &str, measure: F) -> String
where
    F: Fn(&str) -> usize,
{
    if measure(text) <= max_width {
        return text.to_string();
    }

    let mut low = 0;
    let mut high = text.chars().count();
    while low < high {
        let mid = (low + high) / 2;
        let candidate = format!("{}{}", char_prefix(text, mid).trim(), ellipsis);
        if measure(&candidate) > max_width {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    format!(
        "{}{}",
        char_prefix(text, low.saturating_sub(1)).trim(),
        ellipsis
    )
}

/// Greedy word wrap: each line takes as many whole words as fit. A word
/// wider than `max_width` still gets a line of its own.
pub fn wrap_words<F>(text: &str, max_width: usize, measure: F) -> Vec<String>
where
    F: Fn(&str) -> usize,
{
    let mut words: Vec<&str> = text.split(' ').collect();
    let mut lines = Vec::new();

    while !words.is_empty() {
        let mut take = 1;
        for n in 2..=words.len() {
            if measure(&words[..n].join(" ")) <= max_width {
                take = n;
            } else {
                break;
            }
        }
        lines.push(words[..take].join(" "));
        words.drain(..take);
    }

    lines
}

/// Format milliseconds as `M:SS.s`, with a leading `-` when negative.
pub fn format_timer(ms: f64) -> String {
    if ms < 0.0 {
        return format!("-{}", format_timer(-ms));
    }
    let tenths = ((ms % 1000.0) / 100.0).floor() as u64;
    let seconds = ((ms / 1000.0) % 60.0).floor() as u64;
    let minutes = (ms / 60000.0).floor() as u64;
    format!("{}:{:02}.{}", minutes, seconds, tenths)
}

/// Format milliseconds as seconds with one decimal, e.g. `12.3`.
pub fn format_duration(ms: f64) -> String {
    format!("{:.1}", ms / 1000.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn chars(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn test_truncate_fits_unmodified() {
        assert_eq!(truncate_to_width("hello", 5, "…", chars), "hello");
        assert_eq!(truncate_to_width("hello", 50, "…", chars), "hello");
        assert_eq!(truncate_to_width("", 0, "…", chars), "");
    }

    #[test]
    fn test_truncate_adds_ellipsis_within_budget() {
        let out = truncate_to_width("hello world", 8, "…", chars);
        assert_eq!(out, "hello w…");
        assert!(chars(&out) <= 8);
    }

    #[test]
    fn test_truncate_trims_before_ellipsis() {
        // Cutting right after "hello " must not leave a dangling space.
        let out = truncate_to_width("hello world", 7, "…", chars);
        assert_eq!(out, "hello…");
    }

    #[test]
    fn test_truncate_zero_width_is_bare_ellipsis() {
        assert_eq!(truncate_to_width("hello", 0, "…", chars), "…");
        assert_eq!(truncate_to_width("hello", 1, "…", chars), "…");
    }

    #[test]
    fn test_truncate_ascii_ellipsis() {
        let out = truncate_to_width("abcdefghij", 6, "...", chars);
        assert_eq!(out, "abc...");
    }

    #[test]
    fn test_truncate_respects_multibyte_and_wide_chars() {
        let out = truncate_to_width("日本語のテスト", 7, "…", display_width);
        assert!(display_width(&out) <= 7, "got {:?}", out);
        assert!(out.ends_with('…'));
        assert_eq!(out, "日本語…");
    }

    #[test]
    fn test_wrap_packs_whole_words() {
        let lines = wrap_words("the quick brown fox jumps", 10, chars);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_never_splits_long_word() {
        let lines = wrap_words("a supercalifragilistic b", 5, chars);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_single_line() {
        assert_eq!(wrap_words("fits fine", 40, chars), vec!["fits fine"]);
    }

    #[rstest]
    #[case(0.0, "0:00.0")]
    #[case(1234.0, "0:01.2")]
    #[case(59_999.0, "0:59.9")]
    #[case(60_000.0, "1:00.0")]
    #[case(754_300.0, "12:34.3")]
    #[case(-1500.0, "-0:01.5")]
    fn test_format_timer(#[case] ms: f64, #[case] expected: &str) {
        assert_eq!(format_timer(ms), expected);
    }

    #[rstest]
    #[case(0.0, "0.0")]
    #[case(1260.0, "1.3")]
    #[case(12_340.0, "12.3")]
    #[case(-300.0, "-0.3")]
    fn test_format_duration(#[case] ms: f64, #[case] expected: &str) {
        assert_eq!(format_duration(ms), expected);
    }

    #[test]
    fn test_display_width_counts_cells() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
    }
}
