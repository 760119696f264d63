//! Watch event types, options, and the per-file debounce latch

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Debounce cool-down in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory whose `.tcx` documents are tracked
    pub root: PathBuf,
    /// Output as NDJSON
    pub json: bool,
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted {
        root: String,
    },
    /// Bootstrap created a missing trust baseline
    SnapshotCreated {
        path: String,
    },
    FileChanged {
        path: String,
    },
    /// Trusted edit: the snapshot was refreshed from the file
    SnapshotRefreshed {
        path: String,
    },
    /// Untrusted edit: the file was overwritten with a reconciled merge
    Restored {
        path: String,
        editor: String,
    },
    /// Unrecognized editor fingerprint, file left as-is
    Ignored {
        path: String,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Per-file debounce latch
///
/// Each tracked file debounces independently: the first notification opens
/// a cool-down window, further notifications inside the window are
/// coalesced, and the file dispatches exactly once when the window closes.
#[derive(Default)]
pub struct DebounceLatch {
    pending: HashMap<PathBuf, Instant>,
}

impl DebounceLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change notification; returns false when coalesced into an
    /// already-open window
    pub fn notify(&mut self, path: &Path) -> bool {
        if self.pending.contains_key(path) {
            return false;
        }
        self.pending.insert(path.to_path_buf(), Instant::now());
        true
    }

    /// Take the files whose cool-down window has elapsed
    pub fn take_due(&mut self) -> Vec<PathBuf> {
        let window = Duration::from_millis(DEBOUNCE_MS);
        let due: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, since)| since.elapsed() >= window)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &due {
            self.pending.remove(path);
        }
        due
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Content hash used to filter notifications that did not change bytes
pub fn content_hash(content: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
