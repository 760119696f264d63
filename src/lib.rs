//! tcxsync - model reconciliation and backup tool for `.tcx` documents
//!
//! A `.tcx` document holds a hierarchical product-configuration model with
//! two views of the same entities: component classes grouping components,
//! and named domains grouping elements. tcxsync converts between the views,
//! keeps a trusted snapshot of the curated domain sections, and watches for
//! external edits - refreshing the snapshot after trusted edits and merging
//! the snapshot back over destructive untrusted ones.

pub mod document;
pub mod error;
pub mod fs;
pub mod merge;
pub mod model;
pub mod snapshot;
pub mod transform;
pub mod watcher;

// Re-exports for convenience
pub use document::{decode, encode, Document, EditorFingerprint, UntrustedKind, OWN_FINGERPRINT};
pub use error::{TcxError, TcxResult};
pub use fs::{list_tcx_files, FileSystem, LocalFileSystem};
pub use merge::merge_domains;
pub use model::{Component, ComponentClass, Element, Model, NamedDomain, Snapshot};
pub use snapshot::{snapshot_path, SnapshotStore};
pub use transform::{classes_to_domains, domains_to_classes};
pub use watcher::{watch, WatchEvent, WatchOptions};
