//! Frame-accurate export for offline video generation.
//!
//! Frame `n` shows video time `offset + n / FPS - LEAD_IN_SECS`, so an
//! export starts ten seconds before the first test and runs ten seconds
//! past the last event. Every frame goes through [`Project::draw`], the same
//! path the live player uses, and carries no state between calls.

use std::io;
use std::path::Path;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use serde::Serialize;

use crate::config::AppConfig;
use crate::overlay::Appearance;
use crate::playback::{LEAD_IN_SECS, TAIL_SECS};
use crate::project::Project;
use crate::text::display_width;

/// Export frame rate.
pub const FPS: u32 = 60;

/// Size and length of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameInfo {
    pub width: u16,
    pub height: u16,
    pub fps: u32,
    pub number_of_frames: u64,
}

/// Renders any frame of a project on demand.
#[derive(Debug, Clone)]
pub struct FrameExporter<'a> {
    project: &'a Project,
    appearance: Appearance,
    width: u16,
    height: u16,
}

impl<'a> FrameExporter<'a> {
    pub fn new(project: &'a Project, appearance: Appearance, width: u16, height: u16) -> Self {
        Self {
            project,
            appearance,
            width,
            height,
        }
    }

    pub fn from_config(project: &'a Project, config: &AppConfig) -> Self {
        Self::new(
            project,
            Appearance::from_config(config),
            config.export.width,
            config.export.height,
        )
    }

    pub fn info(&self) -> FrameInfo {
        let secs = self.project.timeline.run_length() / 1000.0 + LEAD_IN_SECS + TAIL_SECS;
        FrameInfo {
            width: self.width,
            height: self.height,
            fps: FPS,
            number_of_frames: (secs * f64::from(FPS)).ceil().max(0.0) as u64,
        }
    }

    /// Video time (seconds) shown by `frame`.
    pub fn video_time(&self, frame: u64) -> f64 {
        self.project.config.offset + frame as f64 / f64::from(FPS) - LEAD_IN_SECS
    }

    /// Render `frame` into a fresh buffer.
    pub fn render_frame(&self, frame: u64) -> Buffer {
        let area = Rect::new(0, 0, self.width, self.height);
        let mut buf = Buffer::empty(area);
        let snapshot = self.project.snapshot_at(self.video_time(frame));
        self.project.draw(&mut buf, area, &snapshot, &self.appearance);
        buf
    }

    /// Render `frame` and return its bytes.
    pub fn seek_to_frame(&self, frame: u64) -> Vec<u8> {
        buffer_to_bytes(&self.render_frame(frame))
    }
}

/// Serialize a buffer as UTF-8 text, one `\n`-terminated line per row.
///
/// Cells covered by the right half of a wide character are skipped so the
/// text lines up the way a terminal would show it.
pub fn buffer_to_bytes(buf: &Buffer) -> Vec<u8> {
    let area = buf.area;
    let mut out = String::with_capacity((area.width as usize + 1) * area.height as usize);
    for y in area.top()..area.bottom() {
        let mut skip = 0usize;
        for x in area.left()..area.right() {
            let symbol = buf[(x, y)].symbol();
            if skip == 0 {
                out.push_str(symbol);
            }
            skip = skip.max(display_width(symbol)).saturating_sub(1);
        }
        out.push('\n');
    }
    out.into_bytes()
}

/// Write frames `from..to` as `frame-NNNNNN.txt` into `out_dir`.
///
/// `to` defaults to the frame count and is capped by it. Returns the number
/// of frames written.
pub fn export_frames(
    exporter: &FrameExporter,
    out_dir: &Path,
    from: Option<u64>,
    to: Option<u64>,
    verbose: bool,
) -> io::Result<u64> {
    let total = exporter.info().number_of_frames;
    let to = to.unwrap_or(total).min(total);
    let from = from.unwrap_or(0).min(to);

    std::fs::create_dir_all(out_dir)?;

    for frame in from..to {
        let path = out_dir.join(format!("frame-{:06}.txt", frame));
        std::fs::write(&path, exporter.seek_to_frame(frame))?;
        if verbose && frame % u64::from(FPS) == 0 {
            eprintln!("testreel: export: wrote {}", path.display());
        }
    }

    Ok(to - from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
