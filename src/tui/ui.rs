//! Layout and rendering for the TUI.
//!
//! Two regions:
//! - **Overlay** (fills): the timeline overlay, painted by the same code
//!   that renders exported frames
//! - **Status bar** (bottom, height 1): play state, clock position and key
//!   hints

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::text::{display_width, format_timer};
use crate::tui::app::App;

// ---------------------------------------------------------------------------
// Main draw function
// ---------------------------------------------------------------------------

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    let overlay_area = chunks[0];
    let status_area = chunks[1];

    app.project.draw(
        frame.buffer_mut(),
        overlay_area,
        &app.snapshot,
        &app.appearance,
    );
    draw_status_bar(frame, app, status_area);
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

/// Key hints, as (key, action) pairs.
const SHORTCUTS: [(&str, &str); 4] = [
    ("space", "play"),
    ("\u{2190}/\u{2192}", "1s"),
    ("H/L", "10s"),
    ("q", "quit"),
];

/// Clock segment, e.g. `" ▶ 0:12.3 / 1:05.0"`.
fn position_text(app: &App) -> String {
    let symbols = &app.appearance.symbols;
    let marker = if app.clock.is_playing() {
        symbols.playing
    } else {
        symbols.paused
    };
    format!(
        " {} {} / {}",
        marker,
        format_timer(app.video_time * 1000.0),
        format_timer(app.clock.duration() * 1000.0)
    )
}

/// Compose the status bar. The clock is always shown; shortcuts are
/// dropped from the end when the terminal is too narrow.
fn build_status_bar_line(app: &App, width: usize) -> Line<'static> {
    if width == 0 {
        return Line::from(vec![]);
    }

    let theme = &app.appearance.theme;
    let position = position_text(app);
    let mut used = display_width(&position);
    let mut spans = vec![Span::styled(
        position,
        Style::default().add_modifier(Modifier::BOLD),
    )];

    // Leading gap before the first hint.
    used += 2;
    let mut first = true;
    for (key, action) in SHORTCUTS {
        let cost = display_width(key) + 1 + action.len() + 1;
        if used + cost > width {
            break;
        }
        if first {
            spans.push(Span::raw("  ".to_string()));
            first = false;
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(theme.status_shortcut_key)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(":{} ", action)));
        used += cost;
    }

    Line::from(spans)
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.appearance.theme;
    let bar = build_status_bar_line(app, area.width as usize);

    let paragraph = Paragraph::new(bar)
        .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg));

    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
