//! File system access for tcxsync
//!
//! The snapshot store is generic over this trait so tests can run against
//! an in-memory mock (including one that fails writes on purpose).

use std::path::{Path, PathBuf};

use crate::error::{TcxError, TcxResult};

/// Abstract file system interface
pub trait FileSystem {
    /// Read file content
    fn read_to_string(&self, path: &Path) -> TcxResult<String>;

    /// Write file content, replacing any existing file
    fn write(&self, path: &Path, content: &str) -> TcxResult<()>;

    /// Check if file exists
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> TcxResult<()>;
}

/// Local file system implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read_to_string(&self, path: &Path) -> TcxResult<String> {
        if !path.exists() {
            return Err(TcxError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, content: &str) -> TcxResult<()> {
        Ok(std::fs::write(path, content)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> TcxResult<()> {
        Ok(std::fs::remove_file(path)?)
    }
}

/// Recursively list `.tcx` documents under `root`, skipping hidden
/// directories and legacy domain-backup files
pub fn list_tcx_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(root)
        .follow_links(false)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .filter(|path| is_tracked_document(path))
        .collect();
    files.sort();
    files
}

/// True for `.tcx` model documents the watcher should track
///
/// Legacy `_domain_backup.tcx` snapshots share the extension but are
/// derived data, not tracked documents.
pub fn is_tracked_document(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".tcx") && !name.ends_with("_domain_backup.tcx")
}

/// Mock file system for testing
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    pub files: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<PathBuf, String>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.lock().unwrap().insert(path.into(), content.into());
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> TcxResult<String> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| TcxError::NotFound {
            path: path.to_path_buf(),
        })
    }

    fn write(&self, path: &Path, content: &str) -> TcxResult<()> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn remove_file(&self, path: &Path) -> TcxResult<()> {
        let mut files = self.files.lock().unwrap();
        files.remove(path).map(|_| ()).ok_or_else(|| TcxError::NotFound {
            path: path.to_path_buf(),
        })
    }
}
