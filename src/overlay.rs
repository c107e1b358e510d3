//! Overlay painting.
//!
//! [`render`] turns a resolved [`Snapshot`] into cells on a ratatui
//! [`Buffer`]. It is the single draw path shared by live playback and frame
//! export, so both produce the same cells for the same log time and size.
//!
//! Layout, top to bottom:
//! - the static title lines from the project config
//! - a window of `rows_to_show` rows that scrolls to keep the active row
//!   visible, each row indented by depth with an elapsed/outcome column on
//!   the right
//! - a footer with `Test N of M` and the run timer
//! - the active row's text, word-wrapped

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::config::AppConfig;
use crate::hierarchy::{Row, Timeline};
use crate::resolver::{progress_of, Snapshot};
use crate::symbols::Symbols;
use crate::text::{display_width, format_duration, format_timer, truncate_to_width, wrap_words};
use crate::theme::ThemeColors;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of row slots in the scrolling window.
pub const DEFAULT_ROWS_TO_SHOW: usize = 17;

/// Rows kept visible below the active row.
const LOOKAHEAD: isize = 3;

/// Cells of indentation per nesting level.
const INDENT: u16 = 2;

/// Horizontal padding on both edges.
const PADDING: u16 = 1;

/// Cells reserved on the right of each row for the duration/outcome column.
const RIGHT_COLUMN: u16 = 8;

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Everything one draw pass reads. Nothing here is mutated by rendering.
#[derive(Debug, Clone, Copy)]
pub struct OverlayView<'a> {
    pub timeline: &'a Timeline,
    pub title: &'a [String],
    pub snapshot: &'a Snapshot,
    pub theme: &'a ThemeColors,
    pub symbols: &'a Symbols,
    pub rows_to_show: usize,
}

/// Styling choices that stay fixed for a whole session.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub theme: ThemeColors,
    pub symbols: Symbols,
    pub rows_to_show: usize,
}

impl Appearance {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            theme: ThemeColors::from_theme(&config.theme),
            symbols: Symbols::new(config.ascii),
            rows_to_show: config.display.rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Window selection
// ---------------------------------------------------------------------------

/// Index of the row drawn in the first slot.
///
/// Negative when there are fewer rows than slots; those leading slots stay
/// blank.
pub fn window_start(active_index: usize, row_count: usize, rows_to_show: usize) -> isize {
    let active = active_index as isize;
    let count = row_count as isize;
    let show = rows_to_show as isize;
    (active - show + LOOKAHEAD).max(0).min(count - show)
}

/// Row actually drawn in `slot` when the window puts `row_index` there.
///
/// A row nested deeper than the slot number is swapped for the nearest
/// preceding row at depth `slot`, so the top of the window shows the
/// ancestor chain of the rows below it.
pub fn slot_row(rows: &[Row], row_index: usize, slot: usize) -> usize {
    if rows[row_index].depth <= slot {
        return row_index;
    }
    (0..row_index)
        .rev()
        .find(|&j| rows[j].depth == slot)
        .unwrap_or(row_index)
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Paint the overlay into `area` of `buf`.
pub fn render(buf: &mut Buffer, area: Rect, view: &OverlayView) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }

    buf.set_style(area, Style::default().bg(view.theme.background));

    let mut y = area.y;
    for line in view.title {
        put(buf, area, area.x + PADDING, y, line, Style::default().fg(view.theme.title));
        y = y.saturating_add(1);
    }
    if !view.title.is_empty() {
        y = y.saturating_add(1);
    }

    render_rows(buf, area, y, view);

    let footer_y = y
        .saturating_add(view.rows_to_show.min(u16::MAX as usize) as u16)
        .saturating_add(1);
    render_footer(buf, area, footer_y, view);
}

fn render_rows(buf: &mut Buffer, area: Rect, top: u16, view: &OverlayView) {
    let rows = &view.timeline.rows;
    let Some(active) = view.snapshot.active_index else {
        return;
    };
    let t = view.snapshot.log_time;
    let theme = view.theme;
    let start = window_start(active, rows.len(), view.rows_to_show);

    for slot in 0..view.rows_to_show {
        let Some(y) = top.checked_add(slot as u16).filter(|y| *y < area.bottom()) else {
            break;
        };
        let natural = start + slot as isize;
        if natural < 0 || natural as usize >= rows.len() {
            continue;
        }
        let natural = natural as usize;
        let row = &rows[slot_row(rows, natural, slot)];

        let line = Rect::new(area.x, y, area.width, 1);
        if row.is_running(t) {
            buf.set_style(line, Style::default().bg(theme.running_bg));
            let progress = progress_of(row, t).unwrap_or(0.0).clamp(0.0, 1.0);
            let filled = (f64::from(area.width) * progress) as u16;
            buf.set_style(
                Rect::new(area.x, y, filled, 1),
                Style::default().bg(theme.progress_bg),
            );
        } else if natural == active {
            buf.set_style(line, Style::default().bg(theme.active_bg));
        }

        let fg = if row.shows_outcome_color(t) {
            theme.outcome(row.outcome())
        } else {
            theme.row_text
        };

        let indent = (row.depth.min(u16::MAX as usize) as u16).saturating_mul(INDENT);
        let x = area.x.saturating_add(PADDING).saturating_add(indent);
        let budget = area.right().saturating_sub(x).saturating_sub(RIGHT_COLUMN) as usize;
        let text = truncate_to_width(&row.text, budget, view.symbols.ellipsis, display_width);
        if budget > 0 {
            buf.set_stringn(x, y, &text, budget, Style::default().fg(fg));
        }

        let right = if row.is_finished_at(t) {
            Some((view.symbols.outcome(row.outcome()).to_string(), fg))
        } else {
            row.begin()
                .filter(|begin| t > *begin || natural == active)
                .map(|begin| (format_duration(t - begin), theme.duration))
        };
        if let Some((label, color)) = right {
            put_right(buf, area, y, &label, Style::default().fg(color));
        }
    }
}

fn render_footer(buf: &mut Buffer, area: Rect, y: u16, view: &OverlayView) {
    if y >= area.bottom() {
        return;
    }
    let theme = view.theme;
    let timeline = view.timeline;

    let (timer, phase) = timeline.timer(view.snapshot.log_time);
    put_right(
        buf,
        area,
        y,
        &format_timer(timer),
        Style::default()
            .fg(theme.timer(phase))
            .add_modifier(Modifier::BOLD),
    );

    let Some(row) = view.snapshot.active_row(&timeline.rows) else {
        return;
    };

    let counter = match row.test_num() {
        Some(n) => format!("Test {} of {}", n, timeline.num_tests),
        None => format!("Test - of {}", timeline.num_tests),
    };
    put(
        buf,
        area,
        area.x + PADDING,
        y,
        &counter,
        Style::default()
            .fg(theme.counter)
            .add_modifier(Modifier::BOLD),
    );

    let wrap_width = area.width.saturating_sub(PADDING * 2) as usize;
    let mut line_y = y.saturating_add(1);
    for line in wrap_words(&row.text, wrap_width, display_width) {
        if line_y >= area.bottom() {
            break;
        }
        put(
            buf,
            area,
            area.x + PADDING,
            line_y,
            &line,
            Style::default().fg(theme.headline),
        );
        line_y += 1;
    }
}

/// Write `text` at (`x`, `y`), clipped to `area`.
fn put(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y < area.top() || y >= area.bottom() || x >= area.right() {
        return;
    }
    let max = (area.right() - x) as usize;
    buf.set_stringn(x, y, text, max, style);
}

/// Write `text` right-aligned against the padded right edge of `area`.
fn put_right(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let width = display_width(text).min(u16::MAX as usize) as u16;
    let x = area
        .right()
        .saturating_sub(PADDING)
        .saturating_sub(width)
        .max(area.x);
    put(buf, area, x, y, text, style);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
