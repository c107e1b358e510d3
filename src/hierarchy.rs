//! Reconstruction of the test/group hierarchy from the flat event stream.
//!
//! The result is a flat, append-only list of [`Row`]s. Nesting is implicit
//! in each row's `depth`; group headers are synthesized from the path delta
//! between consecutive tests.

use serde::{Deserialize, Serialize};

use crate::event_log::{Action, Event};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Final state of a finished test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
struct OutcomeRecord {
    state: Outcome,
}

impl Outcome {
    /// Decode the `state` field of an `after` payload.
    ///
    /// A missing payload, non-JSON payload, missing `state`, or unrecognized
    /// state all map to [`Outcome::Unknown`].
    pub fn from_payload(payload: Option<&str>) -> Self {
        payload
            .and_then(|p| serde_json::from_str::<OutcomeRecord>(p).ok())
            .map(|r| r.state)
            .unwrap_or(Outcome::Unknown)
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Timing and result of a test row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSpan {
    pub begin: f64,
    /// 1-based position among all tests.
    pub test_num: usize,
    pub end: Option<f64>,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RowKind {
    Group,
    Test(TestSpan),
}

/// One display row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub depth: usize,
    pub text: String,
    #[serde(flatten)]
    pub kind: RowKind,
}

impl Row {
    fn group(depth: usize, text: &str) -> Self {
        Self {
            depth,
            text: text.to_string(),
            kind: RowKind::Group,
        }
    }

    fn test(depth: usize, text: &str, begin: f64, test_num: usize) -> Self {
        Self {
            depth,
            text: text.to_string(),
            kind: RowKind::Test(TestSpan {
                begin,
                test_num,
                end: None,
                outcome: None,
            }),
        }
    }

    pub fn span(&self) -> Option<&TestSpan> {
        match &self.kind {
            RowKind::Test(span) => Some(span),
            RowKind::Group => None,
        }
    }

    pub fn is_test(&self) -> bool {
        self.span().is_some()
    }

    pub fn begin(&self) -> Option<f64> {
        self.span().map(|s| s.begin)
    }

    pub fn end(&self) -> Option<f64> {
        self.span().and_then(|s| s.end)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.span().and_then(|s| s.outcome)
    }

    pub fn test_num(&self) -> Option<usize> {
        self.span().map(|s| s.test_num)
    }

    /// `begin <= t <= end`. An unfinished test is never running.
    pub fn is_running(&self, t: f64) -> bool {
        match (self.begin(), self.end()) {
            (Some(begin), Some(end)) => begin <= t && t <= end,
            _ => false,
        }
    }

    /// The test has finished at or before `t`.
    pub fn is_finished_at(&self, t: f64) -> bool {
        self.end().is_some_and(|end| end <= t)
    }

    /// Outcome coloring kicks in strictly after `end`.
    pub fn shows_outcome_color(&self, t: f64) -> bool {
        self.end().is_some_and(|end| end < t)
    }

    /// Record the close of an open test. Groups and already-closed tests
    /// are left untouched.
    fn close(&mut self, time: f64, outcome: Outcome) {
        if let RowKind::Test(span) = &mut self.kind {
            if span.end.is_none() {
                span.end = Some(time);
                span.outcome = Some(outcome);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Where the run timer stands relative to the logged run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    BeforeRun,
    Running,
    AfterRun,
}

/// Output of the build phase. Read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Timeline {
    pub rows: Vec<Row>,
    /// Time of the first `before` event (0 when there is none).
    pub min_time: f64,
    /// Latest event time seen.
    pub max_time: f64,
    pub num_tests: usize,
}

impl Timeline {
    /// Map a video-clock time (seconds) to log time (milliseconds).
    pub fn log_time(&self, video_secs: f64, offset: f64) -> f64 {
        (video_secs - offset) * 1000.0 + self.min_time
    }

    /// Length of the run in milliseconds.
    pub fn run_length(&self) -> f64 {
        self.max_time - self.min_time
    }

    /// Run timer value (ms) and phase at `log_time`. The timer runs
    /// negative before the run and stops at the run length.
    pub fn timer(&self, log_time: f64) -> (f64, TimerPhase) {
        let value = (log_time - self.min_time).min(self.run_length());
        let phase = if log_time < self.min_time {
            TimerPhase::BeforeRun
        } else if log_time > self.max_time {
            TimerPhase::AfterRun
        } else {
            TimerPhase::Running
        };
        (value, phase)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build context threaded through the construction pass.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    slice: usize,
    rows: Vec<Row>,
    last_path: Vec<String>,
    min_time: Option<f64>,
    max_time: Option<f64>,
    num_tests: usize,
}

impl HierarchyBuilder {
    pub fn new(slice: usize) -> Self {
        Self {
            slice,
            ..Self::default()
        }
    }

    /// Consume one event. Events must be fed in log order.
    pub fn push(&mut self, event: &Event) {
        self.max_time = Some(self.max_time.map_or(event.time, |m| m.max(event.time)));

        match event.action {
            Action::Before => self.open(event),
            Action::After => self.close(event),
            Action::Unknown => {}
        }
    }

    fn open(&mut self, event: &Event) {
        if self.min_time.is_none() {
            self.min_time = Some(event.time);
        }

        let path = event.segments(self.slice);

        let common = path
            .iter()
            .zip(&self.last_path)
            .take_while(|(new, old)| **new == old.as_str())
            .count();

        let leaf = path.len() - 1;
        for (depth, segment) in path.iter().enumerate().take(leaf).skip(common) {
            self.rows.push(Row::group(depth, segment));
        }

        self.num_tests += 1;
        self.rows
            .push(Row::test(leaf, path[leaf], event.time, self.num_tests));

        self.last_path = path.into_iter().map(str::to_string).collect();
    }

    /// Only the most recently appended row can be closed; anything else
    /// (group-level `after`, duplicate close) is a no-op.
    fn close(&mut self, event: &Event) {
        if let Some(last) = self.rows.last_mut() {
            last.close(event.time, Outcome::from_payload(event.payload()));
        }
    }

    pub fn finish(self) -> Timeline {
        Timeline {
            rows: self.rows,
            min_time: self.min_time.unwrap_or(0.0),
            max_time: self.max_time.unwrap_or(0.0),
            num_tests: self.num_tests,
        }
    }
}

/// Build the row sequence from a complete, ordered event list.
pub fn build(events: &[Event], slice: usize) -> Timeline {
    let mut builder = HierarchyBuilder::new(slice);
    for event in events {
        builder.push(event);
    }
    builder.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
