//! File watcher for continuous model reconciliation
//!
//! Implements the `watch` command with:
//! - Per-file debouncing (100ms)
//! - Editor-fingerprint dispatch (refresh / restore / ignore)
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

mod event;
mod run;

pub use event::{content_hash, DebounceLatch, WatchEvent, WatchOptions, DEBOUNCE_MS};
pub use run::watch;
