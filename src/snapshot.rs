//! Snapshot store: the trusted baseline for reconciliation
//!
//! A snapshot is a reduced copy of a model (everything except component
//! classes) written next to its source document. Snapshots are deleted and
//! recreated whole, never patched in place. The delete-then-write sequence
//! is deliberately not atomic: a crash in between leaves a missing snapshot,
//! which is detectable and regenerable, never a corrupt one. The same
//! applies to the document replacement done by `restore`.

use std::path::{Path, PathBuf};

use crate::document;
use crate::error::{TcxError, TcxResult};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::merge::merge_domains;
use crate::model::{Model, Snapshot};

/// Snapshot file for a document: `truck.tcx` → `truck_backup.json`
pub fn snapshot_path(file: &Path) -> PathBuf {
    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let backup = match name.strip_suffix(".tcx") {
        Some(stem) => format!("{stem}_backup.json"),
        None => format!("{name}_backup.json"),
    };
    file.with_file_name(backup)
}

/// Legacy snapshot naming: `truck_data.tcx` → `truck_domain_backup.tcx`
///
/// Legacy snapshots are a pre-JSON format holding a domains-only document in
/// the `.tcx` shape. They are read but never written; a refresh replaces
/// them with the JSON format.
pub fn legacy_snapshot_path(file: &Path) -> Option<PathBuf> {
    let name = file.file_name().and_then(|n| n.to_str())?;
    let stem = name.strip_suffix("_data.tcx")?;
    Some(file.with_file_name(format!("{stem}_domain_backup.tcx")))
}

/// Snapshot persistence and the restore protocol
///
/// Generic over [`FileSystem`] so tests can run in memory and inject write
/// failures.
pub struct SnapshotStore<FS: FileSystem = LocalFileSystem> {
    fs: FS,
}

impl Default for SnapshotStore<LocalFileSystem> {
    fn default() -> Self {
        Self::new(LocalFileSystem)
    }
}

impl<FS: FileSystem> SnapshotStore<FS> {
    pub fn new(fs: FS) -> Self {
        Self { fs }
    }

    /// Check whether a snapshot (current or legacy format) exists for `file`
    pub fn exists(&self, file: &Path) -> bool {
        if self.fs.exists(&snapshot_path(file)) {
            return true;
        }
        legacy_snapshot_path(file)
            .map(|p| self.fs.exists(&p))
            .unwrap_or(false)
    }

    /// Read and decode `file`, then capture and persist a fresh snapshot
    pub fn create(&self, file: &Path) -> TcxResult<Snapshot> {
        let text = self.fs.read_to_string(file)?;
        let doc = document::decode(file, &text)?;
        let snapshot = Snapshot::from_model(&doc.model);
        self.persist(file, &snapshot)?;
        Ok(snapshot)
    }

    /// Write a snapshot, deleting any prior one first
    ///
    /// Not atomic: a failure after the delete leaves no snapshot for `file`.
    /// A failed write is always reported even though the delete succeeded.
    pub fn persist(&self, file: &Path, snapshot: &Snapshot) -> TcxResult<()> {
        self.delete(file)?;
        let json = serde_json::to_string(snapshot).map_err(|e| TcxError::Parse {
            path: snapshot_path(file),
            message: e.to_string(),
        })?;
        self.fs.write(&snapshot_path(file), &json)
    }

    /// Load the snapshot for `file`, falling back to the legacy format
    pub fn load(&self, file: &Path) -> TcxResult<Snapshot> {
        let path = snapshot_path(file);
        if self.fs.exists(&path) {
            let json = self.fs.read_to_string(&path)?;
            return serde_json::from_str(&json).map_err(|e| TcxError::Parse {
                path,
                message: e.to_string(),
            });
        }

        if let Some(legacy) = legacy_snapshot_path(file) {
            if self.fs.exists(&legacy) {
                let text = self.fs.read_to_string(&legacy)?;
                let doc = document::decode(&legacy, &text)?;
                return Ok(Snapshot::from_model(&doc.model));
            }
        }

        Err(TcxError::NotFound { path })
    }

    /// Delete the snapshot for `file` in both formats, if present
    pub fn delete(&self, file: &Path) -> TcxResult<()> {
        let path = snapshot_path(file);
        if self.fs.exists(&path) {
            self.fs.remove_file(&path)?;
        }
        if let Some(legacy) = legacy_snapshot_path(file) {
            if self.fs.exists(&legacy) {
                self.fs.remove_file(&legacy)?;
            }
        }
        Ok(())
    }

    /// Reconcile an untrusted edit of `file` against its trusted snapshot
    ///
    /// Keeps what the edit legitimately added (including structural class
    /// changes), restores what it destroyed, and replaces both the document
    /// and the snapshot with the reconciled state.
    pub fn restore(&self, file: &Path) -> TcxResult<Model> {
        let text = self.fs.read_to_string(file)?;
        let doc = document::decode(file, &text)?;
        let snapshot = self.load(file)?;

        // Current file first, trusted snapshot second: trusted fields win
        // element-name collisions.
        let merged = merge_domains(&doc.model.named_domains, &snapshot.named_domains);

        let mut rebuilt = snapshot.into_model(doc.model.component_classes);
        rebuilt.named_domains = merged;

        let encoded = document::encode(&rebuilt)?;

        self.delete(file)?;
        self.fs.remove_file(file)?;
        self.fs.write(file, &encoded)?;
        self.persist(file, &Snapshot::from_model(&rebuilt))?;

        Ok(rebuilt)
    }
}
