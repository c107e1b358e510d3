//! Time-synchronized state resolution.
//!
//! Given the built rows and a log time, decide which row is "current" and
//! how far along it is. Pure and stateless: seeking backwards or forwards
//! gives the same answer as arriving at the time by normal playback.

use crate::hierarchy::Row;

/// What the renderer needs to know about one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub log_time: f64,
    /// Row the viewport treats as current. `None` only for an empty log.
    pub active_index: Option<usize>,
    /// Fraction of the active test elapsed, when it has both begin and end.
    pub progress: Option<f64>,
}

impl Snapshot {
    pub fn active_row<'a>(&self, rows: &'a [Row]) -> Option<&'a Row> {
        self.active_index.and_then(|i| rows.get(i))
    }
}

/// Index of the last row (by position) that has finished at `log_time`.
///
/// Rows are not ordered by end time, so this is a full scan.
pub fn last_finished_index(rows: &[Row], log_time: f64) -> Option<usize> {
    rows.iter().rposition(|row| row.is_finished_at(log_time))
}

/// Resolve the active row and its progress at `log_time`.
///
/// The active row is the first row with a begin time after the last
/// finished row. When no such row exists the last row is used, which keeps
/// the final test on screen once the run is over.
pub fn resolve(rows: &[Row], log_time: f64) -> Snapshot {
    let start = last_finished_index(rows, log_time).map_or(0, |i| i + 1);

    let active_index = rows
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, row)| row.begin().is_some())
        .map(|(i, _)| i)
        .or_else(|| rows.len().checked_sub(1));

    let progress = active_index
        .and_then(|i| rows.get(i))
        .and_then(|row| progress_of(row, log_time));

    Snapshot {
        log_time,
        active_index,
        progress,
    }
}

/// `(t - begin) / (end - begin)`, unclamped. A zero-length test is either
/// not started (`0.0`) or complete (`1.0`).
pub fn progress_of(row: &Row, log_time: f64) -> Option<f64> {
    let begin = row.begin()?;
    let end = row.end()?;
    let length = end - begin;
    if length <= 0.0 {
        return Some(if log_time >= end { 1.0 } else { 0.0 });
    }
    Some((log_time - begin) / length)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
