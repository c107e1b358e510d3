//! End-to-end integration tests for the testreel pipeline.
//!
//! These tests exercise the handoff between modules that unit tests
//! cannot cover: loading a project from disk, resolving it at arbitrary
//! video times, and checking that exported frames match what the live
//! player paints.

use std::io::Write;
use std::path::{Path, PathBuf};

use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tempfile::TempDir;

use testreel::config::AppConfig;
use testreel::export::{buffer_to_bytes, export_frames, FrameExporter};
use testreel::hierarchy::Outcome;
use testreel::overlay::Appearance;
use testreel::project::{load_project, Project};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PROJECT_TOML: &str = r#"
offset = 5.0
slice = 1
title = ["Acme web", "e2e run #42"]
"#;

const EVENT_LOG: &str = r#"[1000,"before","root :=> Auth :=> Login :=> accepts valid password"]
[2200,"after","root :=> Auth :=> Login :=> accepts valid password","{\"state\":\"passed\"}"]
[2200,"before","root :=> Auth :=> Login :=> rejects bad password"]
[3000,"after","root :=> Auth :=> Login :=> rejects bad password","{\"state\":\"failed\",\"err\":\"expected 401\"}"]

[3100,"before","root :=> Auth :=> Logout :=> clears session"]
[3100,"after","root :=> Auth :=> Logout :=> clears session","{\"state\":\"pending\"}"]
[3500,"before","root :=> Billing :=> charges card"]
[5000,"after","root :=> Billing :=> charges card"]
"#;

/// Write a file, creating parent directories as needed.
fn write_file(dir: &Path, relative_path: &str, content: &str) {
    let path = dir.join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

/// Lay out `runs/nightly.{toml,log}` and return the project prefix.
fn setup_project(tmp: &TempDir) -> PathBuf {
    write_file(tmp.path(), "runs/nightly.toml", PROJECT_TOML);
    write_file(tmp.path(), "runs/nightly.log", EVENT_LOG);
    tmp.path().join("runs").join("nightly")
}

/// Paint `project` at `video_secs` the way the live player does, through a
/// real ratatui terminal.
fn live_screen(project: &Project, video_secs: f64, config: &AppConfig) -> Vec<u8> {
    let backend = TestBackend::new(config.export.width, config.export.height);
    let mut terminal = Terminal::new(backend).unwrap();
    let appearance = Appearance::from_config(config);
    let snapshot = project.snapshot_at(video_secs);
    terminal
        .draw(|frame| {
            let area = frame.area();
            project.draw(frame.buffer_mut(), area, &snapshot, &appearance);
        })
        .unwrap();
    buffer_to_bytes(terminal.backend().buffer())
}

// ---------------------------------------------------------------------------
// Test 1: Load from disk to row sequence
// ---------------------------------------------------------------------------

#[test]
fn test_load_builds_hierarchy() {
    let tmp = TempDir::new().unwrap();
    let project = load_project(&setup_project(&tmp)).unwrap();
    let timeline = &project.timeline;

    let outline: Vec<(usize, &str, bool)> = timeline
        .rows
        .iter()
        .map(|r| (r.depth, r.text.as_str(), r.is_test()))
        .collect();
    assert_eq!(
        outline,
        vec![
            (0, "Auth", false),
            (1, "Login", false),
            (2, "accepts valid password", true),
            (2, "rejects bad password", true),
            (1, "Logout", false),
            (2, "clears session", true),
            (0, "Billing", false),
            (1, "charges card", true),
        ]
    );

    assert_eq!(timeline.num_tests, 4);
    assert_eq!(timeline.min_time, 1000.0);
    assert_eq!(timeline.max_time, 5000.0);
    assert!(project.ordering_issues.is_empty());

    let outcomes: Vec<Option<Outcome>> = timeline
        .rows
        .iter()
        .filter(|r| r.is_test())
        .map(|r| r.outcome())
        .collect();
    assert_eq!(
        outcomes,
        vec![
            Some(Outcome::Passed),
            Some(Outcome::Failed),
            Some(Outcome::Pending),
            Some(Outcome::Unknown),
        ]
    );
}

#[test]
fn test_rows_serialize_to_json() {
    let tmp = TempDir::new().unwrap();
    let project = load_project(&setup_project(&tmp)).unwrap();
    let json = serde_json::to_value(&project.timeline).unwrap();

    assert_eq!(json["num_tests"], 4);
    assert_eq!(json["rows"][0]["type"], "group");
    assert_eq!(json["rows"][2]["type"], "test");
    assert_eq!(json["rows"][2]["test_num"], 1);
    assert_eq!(json["rows"][2]["outcome"], "passed");
    assert_eq!(json["rows"][7]["outcome"], "unknown");
}

// ---------------------------------------------------------------------------
// Test 2: Resolution at arbitrary video times
// ---------------------------------------------------------------------------

#[test]
fn test_resolve_across_the_run() {
    let tmp = TempDir::new().unwrap();
    let project = load_project(&setup_project(&tmp)).unwrap();

    // Before the run: first test is active, not yet started.
    let snap = project.snapshot_at(0.0);
    assert_eq!(snap.log_time, -4000.0);
    assert_eq!(snap.active_index, Some(2));

    // offset lines up with the first test's start.
    let snap = project.snapshot_at(5.0);
    assert_eq!(snap.log_time, 1000.0);
    assert_eq!(snap.active_index, Some(2));
    assert_eq!(snap.progress, Some(0.0));

    // Halfway through the second test.
    let snap = project.snapshot_at(6.6);
    assert_eq!(snap.active_index, Some(3));
    let progress = snap.progress.unwrap();
    assert!((progress - 0.5).abs() < 1e-9, "progress = {}", progress);

    // The zero-length test has finished; the next test with a start is
    // active even before it begins.
    let snap = project.snapshot_at(7.2);
    assert_eq!(snap.active_index, Some(7));

    // Long after the end the last row stays active.
    let snap = project.snapshot_at(60.0);
    assert_eq!(snap.active_index, Some(7));
    assert_eq!(snap.progress.map(|p| p > 1.0), Some(true));
}

#[test]
fn test_seek_order_does_not_matter() {
    let tmp = TempDir::new().unwrap();
    let project = load_project(&setup_project(&tmp)).unwrap();

    let times = [0.0, 5.0, 5.5, 6.2, 6.9, 7.25, 8.0, 9.9, 12.0, 30.0];
    let forward: Vec<_> = times.iter().map(|t| project.snapshot_at(*t)).collect();
    let shuffled_order = [7, 2, 9, 0, 5, 1, 8, 3, 6, 4];
    for i in shuffled_order {
        assert_eq!(project.snapshot_at(times[i]), forward[i], "t = {}", times[i]);
    }
}

// ---------------------------------------------------------------------------
// Test 3: Export matches the live draw path
// ---------------------------------------------------------------------------

#[test]
fn test_export_frame_matches_live_screen() {
    let tmp = TempDir::new().unwrap();
    let project = load_project(&setup_project(&tmp)).unwrap();
    let config = AppConfig::default();
    let exporter = FrameExporter::from_config(&project, &config);

    for frame in [0, 600, 660, 720, 1000, 1439] {
        let video = exporter.video_time(frame);
        assert_eq!(
            exporter.seek_to_frame(frame),
            live_screen(&project, video, &config),
            "frame {}",
            frame
        );
    }
}

#[test]
fn test_export_frame_content() {
    let tmp = TempDir::new().unwrap();
    let project = load_project(&setup_project(&tmp)).unwrap();
    let exporter = FrameExporter::from_config(&project, &AppConfig::default());

    // Frame 720 is video 7.0s, log time 3000: the second test just failed.
    let text = String::from_utf8(exporter.seek_to_frame(720)).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("Acme web"));
    assert!(lines[1].contains("e2e run #42"));
    assert!(text.contains("accepts valid password"));
    assert!(text.contains("\u{2714}"), "passed glyph missing:\n{}", text);
    assert!(text.contains("\u{2718}"), "failed glyph missing:\n{}", text);
    assert!(text.contains("Test 3 of 4"));
    assert!(text.contains("0:02.0"));
}

#[test]
fn test_export_ascii_glyphs() {
    let tmp = TempDir::new().unwrap();
    let project = load_project(&setup_project(&tmp)).unwrap();
    let config = AppConfig {
        ascii: true,
        ..AppConfig::default()
    };
    let exporter = FrameExporter::from_config(&project, &config);
    let text = String::from_utf8(exporter.seek_to_frame(1439)).unwrap();
    assert!(!text.contains('\u{2714}'));
    assert!(text.contains("Test 4 of 4"));
}

#[test]
fn test_info_and_export_to_directory() {
    let tmp = TempDir::new().unwrap();
    let project = load_project(&setup_project(&tmp)).unwrap();
    let exporter = FrameExporter::from_config(&project, &AppConfig::default());

    // (4s run + 10s lead-in + 10s tail) * 60fps
    let info = exporter.info();
    assert_eq!(info.number_of_frames, 1440);
    assert_eq!((info.width, info.height, info.fps), (80, 32, 60));

    let out = tmp.path().join("frames");
    let written = export_frames(&exporter, &out, Some(1430), None, false).unwrap();
    assert_eq!(written, 10);

    let mut names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names.first().map(String::as_str), Some("frame-001430.txt"));
    assert_eq!(names.last().map(String::as_str), Some("frame-001439.txt"));

    let on_disk = std::fs::read(out.join("frame-001435.txt")).unwrap();
    assert_eq!(on_disk, exporter.seek_to_frame(1435));
}
