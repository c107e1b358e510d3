//! Event log parsing.
//!
//! A test-run log is newline-delimited JSON where every line is an array
//! `[time, action, path, ...extra]`. Lines are parsed in file order and the
//! result is never re-sorted: the hierarchy builder relies on file order.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Literal token joining hierarchy segments inside the `path` field.
pub const PATH_SEPARATOR: &str = " :=> ";

// ---------------------------------------------------------------------------
// Action enum
// ---------------------------------------------------------------------------

/// The `action` element of a log line.
///
/// Any action string other than `before`/`after` deserializes to
/// `Unknown`, which the hierarchy builder skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Before,
    After,
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Event struct
// ---------------------------------------------------------------------------

/// A single parsed log line.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Log timestamp in milliseconds.
    pub time: f64,
    pub action: Action,
    /// Hierarchy path, segments joined by [`PATH_SEPARATOR`].
    pub path: String,
    /// Trailing string payloads. `extra[0]` of an `after` event carries the
    /// serialized outcome record.
    pub extra: Vec<String>,
}

impl Event {
    /// Split the path into segments and drop `slice` leading ones.
    ///
    /// The last segment always survives so that every `before` event still
    /// names a test.
    pub fn segments(&self, slice: usize) -> Vec<&str> {
        let all: Vec<&str> = self.path.split(PATH_SEPARATOR).collect();
        let skip = slice.min(all.len().saturating_sub(1));
        all[skip..].to_vec()
    }

    /// The outcome payload (`extra[0]`), if present.
    pub fn payload(&self) -> Option<&str> {
        self.extra.first().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while parsing a whole log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogError {
    /// A non-blank line could not be decoded into an [`Event`].
    Malformed { line: usize, reason: String },
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Malformed { line, reason } => {
                write!(f, "malformed log line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for LogError {}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one log line into an [`Event`].
///
/// Returns a human-readable reason on failure; [`parse_log`] attaches the
/// line number.
pub fn parse_event_line(line: &str) -> Result<Event, String> {
    let value: Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
    let items = match value {
        Value::Array(items) => items,
        other => return Err(format!("expected a JSON array, got {}", json_kind(&other))),
    };

    let mut items = items.into_iter();

    let time = match items.next() {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| "time is not representable as f64".to_string())?,
        Some(other) => return Err(format!("time must be a number, got {}", json_kind(&other))),
        None => return Err("missing time".to_string()),
    };

    let action = match items.next() {
        Some(v @ Value::String(_)) => {
            serde_json::from_value::<Action>(v).map_err(|e| e.to_string())?
        }
        Some(other) => {
            return Err(format!("action must be a string, got {}", json_kind(&other)))
        }
        None => return Err("missing action".to_string()),
    };

    let path = match items.next() {
        Some(Value::String(s)) => s,
        Some(other) => return Err(format!("path must be a string, got {}", json_kind(&other))),
        None => return Err("missing path".to_string()),
    };

    let extra = items
        .enumerate()
        .map(|(i, v)| match v {
            Value::String(s) => Ok(s),
            other => Err(format!("extra[{}] must be a string, got {}", i, json_kind(&other))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Event {
        time,
        action,
        path,
        extra,
    })
}

/// Parse a complete log. Blank lines are skipped; the first malformed line
/// aborts the whole parse.
pub fn parse_log(text: &str) -> Result<Vec<Event>, LogError> {
    let mut events = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event = parse_event_line(trimmed).map_err(|reason| LogError::Malformed {
            line: idx + 1,
            reason,
        })?;
        events.push(event);
    }
    Ok(events)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Ordering diagnostics
// ---------------------------------------------------------------------------

/// An event whose time is lower than the event before it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingIssue {
    /// Index of the offending event in the parsed list.
    pub index: usize,
    pub previous_time: f64,
    pub time: f64,
}

impl fmt::Display for OrderingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "event {} at {} ms comes after an event at {} ms",
            self.index, self.time, self.previous_time
        )
    }
}

/// Report every place where event times go backwards.
///
/// Purely diagnostic: nothing downstream rejects or reorders such logs.
pub fn check_ordering(events: &[Event]) -> Vec<OrderingIssue> {
    events
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1].time < pair[0].time)
        .map(|(i, pair)| OrderingIssue {
            index: i + 1,
            previous_time: pair[0].time,
            time: pair[1].time,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
