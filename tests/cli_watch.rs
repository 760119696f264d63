//! E2E tests for `tcxsync watch`
//!
//! These spawn the binary, let the watcher run briefly, and assert on the
//! NDJSON event stream.

mod common;

use common::*;
use std::fs;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn watch_bootstraps_snapshots_and_emits_start_event() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("truck.tcx"),
        document_text("TCX Studio 4.11", engine_domains(&["Power"]), serde_json::json!({})),
    )
    .unwrap();

    let mut child = Command::new(tcxsync_bin())
        .args(["--json", "watch"])
        .current_dir(temp.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start tcxsync watch");

    thread::sleep(Duration::from_millis(1000));

    let _ = child.kill();
    let output = child.wait_with_output().expect("Failed to get output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains("watch_started"),
        "Expected watch_started event. Got: {}",
        stdout
    );
    assert!(
        stdout.contains("snapshot_created"),
        "Expected bootstrap snapshot event. Got: {}",
        stdout
    );
    assert!(temp.path().join("truck_backup.json").exists());
}

#[test]
fn watch_restores_after_untrusted_edit() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("truck.tcx");
    fs::write(
        &file,
        document_text("TCX Studio 4.11", engine_domains(&["Fuel"]), serde_json::json!({})),
    )
    .unwrap();

    let mut child = Command::new(tcxsync_bin())
        .args(["--json", "watch"])
        .current_dir(temp.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start tcxsync watch");

    // Let bootstrap and the startup cooldown pass.
    thread::sleep(Duration::from_millis(1500));

    // Simulate a spreadsheet rewrite that drops Fuel.
    fs::write(
        &file,
        document_text(
            "Microsoft Excel 2016",
            engine_domains(&["Power"]),
            serde_json::json!({}),
        ),
    )
    .unwrap();

    // Debounce window plus reconciliation time.
    thread::sleep(Duration::from_millis(1500));

    let _ = child.kill();
    let output = child.wait_with_output().expect("Failed to get output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains("\"event\":\"restored\""),
        "Expected restored event. Got: {}",
        stdout
    );
    assert!(stdout.contains("\"editor\":\"Excel\""));

    let text = fs::read_to_string(&file).unwrap();
    let doc = tcxsync::document::decode(&file, &text).unwrap();
    let names: Vec<_> = doc.model.named_domains[0]
        .elements
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Power", "Fuel"]);
}

#[test]
fn watch_ignores_unknown_editor() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("truck.tcx");
    fs::write(
        &file,
        document_text("TCX Studio 4.11", engine_domains(&["Power"]), serde_json::json!({})),
    )
    .unwrap();

    let mut child = Command::new(tcxsync_bin())
        .args(["--json", "watch"])
        .current_dir(temp.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start tcxsync watch");

    thread::sleep(Duration::from_millis(1500));

    let edited = document_text("vim 9.1", engine_domains(&["Weight"]), serde_json::json!({}));
    fs::write(&file, &edited).unwrap();

    thread::sleep(Duration::from_millis(1500));

    let _ = child.kill();
    let output = child.wait_with_output().expect("Failed to get output");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains("\"event\":\"ignored\""),
        "Expected ignored event. Got: {}",
        stdout
    );
    // The file was left exactly as the unknown editor wrote it.
    assert_eq!(fs::read_to_string(&file).unwrap(), edited);
}
