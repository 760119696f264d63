//! Watch loop: observe `.tcx` edits and keep trust baselines reconciled

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::document::{self, EditorFingerprint};
use crate::error::{TcxError, TcxResult};
use crate::fs::{is_tracked_document, list_tcx_files, FileSystem, LocalFileSystem};
use crate::snapshot::SnapshotStore;

use super::event::{content_hash, DebounceLatch, WatchEvent, WatchOptions};

/// Start watching for document changes
///
/// Runs until `running` goes false. All reconciliation work happens
/// synchronously inside this loop; the per-file debounce latch guarantees a
/// file never has two overlapping dispatches.
pub fn watch(
    options: WatchOptions,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> TcxResult<()> {
    event_callback(WatchEvent::WatchStarted {
        root: options.root.display().to_string(),
    });

    let store = SnapshotStore::default();
    let tracked = list_tcx_files(&options.root);

    // Bootstrap trust baselines for files that have none yet.
    for file in &tracked {
        if !store.exists(file) {
            match store.create(file) {
                Ok(_) => event_callback(WatchEvent::SnapshotCreated {
                    path: file.display().to_string(),
                }),
                Err(e) => event_callback(WatchEvent::Error {
                    message: e.to_string(),
                }),
            }
        }
    }

    // Track content hashes so editor auto-save noise does not dispatch.
    let fs = LocalFileSystem;
    let mut hashes: HashMap<PathBuf, String> = HashMap::new();
    for file in &tracked {
        if let Ok(content) = fs.read_to_string(file) {
            hashes.insert(file.clone(), content_hash(&content));
        }
    }

    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        Config::default(),
    )
    .map_err(|e| TcxError::Io(std::io::Error::other(e.to_string())))?;

    watcher
        .watch(&options.root, RecursiveMode::Recursive)
        .map_err(|e| TcxError::Io(std::io::Error::other(e.to_string())))?;

    // Startup cooldown: drain the events notify sometimes emits for
    // existing files when the watcher is first registered.
    let cooldown_end = Instant::now() + Duration::from_millis(500);
    while Instant::now() < cooldown_end {
        let _ = rx.recv_timeout(Duration::from_millis(50));
    }

    let mut latch = DebounceLatch::new();

    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
            if is_tracked_document(&path) {
                let canonical = path.canonicalize().unwrap_or(path);

                // Deleted or unreadable files have nothing to dispatch.
                if let Ok(content) = fs.read_to_string(&canonical) {
                    let new_hash = content_hash(&content);
                    if hashes.get(&canonical) != Some(&new_hash) {
                        hashes.insert(canonical.clone(), new_hash);
                        if latch.notify(&canonical) {
                            event_callback(WatchEvent::FileChanged {
                                path: canonical.display().to_string(),
                            });
                        }
                    }
                }
            }
        }

        for file in latch.take_due() {
            match dispatch(&file, &store) {
                Ok(event) => {
                    // A restore rewrote the file; remember the new bytes so
                    // our own write does not dispatch again.
                    if matches!(event, WatchEvent::Restored { .. }) {
                        if let Ok(content) = fs.read_to_string(&file) {
                            hashes.insert(file.clone(), content_hash(&content));
                        }
                    }
                    event_callback(event);
                }
                Err(e) => event_callback(WatchEvent::Error {
                    message: e.to_string(),
                }),
            }
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

/// Handle one debounced change: inspect the editor fingerprint once and
/// refresh, restore, or ignore accordingly
pub(crate) fn dispatch(file: &Path, store: &SnapshotStore) -> TcxResult<WatchEvent> {
    let text = LocalFileSystem.read_to_string(file)?;
    let doc = document::decode(file, &text)?;

    match doc.fingerprint() {
        EditorFingerprint::Trusted => {
            store.create(file)?;
            Ok(WatchEvent::SnapshotRefreshed {
                path: file.display().to_string(),
            })
        }
        EditorFingerprint::Untrusted(kind) => {
            store.restore(file)?;
            Ok(WatchEvent::Restored {
                path: file.display().to_string(),
                editor: kind.to_string(),
            })
        }
        EditorFingerprint::Unknown => Ok(WatchEvent::Ignored {
            path: file.display().to_string(),
        }),
    }
}
