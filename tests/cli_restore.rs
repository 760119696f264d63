//! E2E tests for `tcxsync restore`

mod common;

use common::*;
use std::fs;
use tempfile::tempdir;

use tcxsync::document;

#[test]
fn restore_merges_snapshot_back_over_destructive_edit() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("truck.tcx");

    // Trusted baseline: Engine domain holds Fuel.
    fs::write(
        &file,
        document_text("TCX Studio 4.11", engine_domains(&["Fuel"]), serde_json::json!({})),
    )
    .unwrap();
    assert!(run_tcxsync(temp.path(), &["backup", "--file", "truck.tcx"]).status.success());

    // An untrusted rewrite drops Fuel and adds Power.
    fs::write(
        &file,
        document_text(
            "Microsoft Excel 2016",
            engine_domains(&["Power"]),
            engine_classes(&[("Power", "kW")]),
        ),
    )
    .unwrap();

    let output = run_tcxsync(temp.path(), &["restore", "--file", "truck.tcx"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("truck.tcx was restored"));

    let text = fs::read_to_string(&file).unwrap();
    let doc = document::decode(&file, &text).unwrap();

    // Union, current-file elements first, trusted snapshot restored after.
    let names: Vec<_> = doc.model.named_domains[0]
        .elements
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Power", "Fuel"]);

    // Structural class edits from the untrusted tool are kept.
    assert_eq!(doc.model.component_classes[0].name, "Engine");

    // The rebuilt document is trusted again.
    assert_eq!(doc.edited_with, document::OWN_FINGERPRINT);

    // And the snapshot was refreshed from the reconciled state.
    let json = fs::read_to_string(temp.path().join("truck_backup.json")).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&json).unwrap();
    let elements = snapshot["namedDomains"][0]["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 2);
}

#[test]
fn restore_without_snapshot_fails_and_keeps_file() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("truck.tcx");
    let original = document_text(
        "Microsoft Excel 2016",
        engine_domains(&["Power"]),
        serde_json::json!({}),
    );
    fs::write(&file, &original).unwrap();

    let output = run_tcxsync(temp.path(), &["restore", "--file", "truck.tcx"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("not found"));
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn restore_reads_legacy_domain_backup() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("truck_data.tcx");

    // Legacy snapshot in the pre-JSON document shape.
    fs::write(
        temp.path().join("truck_domain_backup.tcx"),
        document_text("TCX Studio 4.11", engine_domains(&["Fuel"]), serde_json::json!({})),
    )
    .unwrap();
    fs::write(
        &file,
        document_text(
            "Microsoft Excel 2016",
            engine_domains(&["Power"]),
            serde_json::json!({}),
        ),
    )
    .unwrap();

    let output = run_tcxsync(temp.path(), &["restore", "--file", "truck_data.tcx"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let text = fs::read_to_string(&file).unwrap();
    let doc = document::decode(&file, &text).unwrap();
    let names: Vec<_> = doc.model.named_domains[0]
        .elements
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Power", "Fuel"]);

    // The legacy snapshot was superseded by the JSON format.
    assert!(!temp.path().join("truck_domain_backup.tcx").exists());
    assert!(temp.path().join("truck_data_backup.json").exists());
}

#[test]
fn restore_undecodable_document_fails() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("truck.tcx"), "not a document").unwrap();
    fs::write(temp.path().join("truck_backup.json"), "{}").unwrap();

    let output = run_tcxsync(temp.path(), &["restore", "--file", "truck.tcx"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("cannot decode"));
}
