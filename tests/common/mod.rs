//! Common test utilities for tcxsync CLI tests.
//!
//! Provides document fixture builders in the compact wire shape and a
//! helper to run the tcxsync binary inside a temp directory.

use std::path::Path;
use std::process::{Command, Output};

/// Path to the tcxsync binary under test
pub fn tcxsync_bin() -> &'static str {
    env!("CARGO_BIN_EXE_tcxsync")
}

/// Run tcxsync with `args` inside `cwd`, with stdin closed so prompts fail
/// fast instead of hanging
pub fn run_tcxsync(cwd: &Path, args: &[&str]) -> Output {
    Command::new(tcxsync_bin())
        .args(args)
        .current_dir(cwd)
        .stdin(std::process::Stdio::null())
        .output()
        .expect("Failed to run tcxsync")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Build a compact-shape document with the given fingerprint and sections
pub fn document_text(
    edited_with: &str,
    named_domains: serde_json::Value,
    component_classes: serde_json::Value,
) -> String {
    serde_json::json!({
        "model-data": {
            "identification": {
                "created-by": {"text": edited_with},
                "edited-with": {"text": edited_with},
                "date": {"text": "Mon, 03 Aug 2026 10:00:00 +0200"},
                "xml-version": {"text": "4.11"}
            },
            "model": {
                "named-domains": named_domains,
                "component-classes": component_classes,
                "root-parts": {},
                "collections": {},
                "applications": {},
                "includes": {}
            }
        }
    })
    .to_string()
}

/// An `Engine` class section with the given component names
pub fn engine_classes(components: &[(&str, &str)]) -> serde_json::Value {
    serde_json::json!({
        "component-class": [{
            "name": {"text": "Engine"},
            "description": {"text": "Engine variants"},
            "components": {
                "component": components
                    .iter()
                    .map(|(name, description)| serde_json::json!({
                        "name": {"text": name},
                        "description": {"text": description},
                        "feature-values": {}
                    }))
                    .collect::<Vec<_>>()
            }
        }]
    })
}

/// An `Engine` domain section with the given element names
pub fn engine_domains(elements: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "named-domain": [{
            "name": {"text": "Engine"},
            "elements": {
                "element": elements
                    .iter()
                    .enumerate()
                    .map(|(index, name)| serde_json::json!({
                        "index": {"text": index},
                        "name": {"text": name},
                        "description": {"text": ""}
                    }))
                    .collect::<Vec<_>>()
            }
        }]
    })
}
