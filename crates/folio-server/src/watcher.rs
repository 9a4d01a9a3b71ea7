//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A JSON content document changed
    ContentModified(PathBuf),

    /// A stylesheet changed
    StyleModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Any other modification
    Modified(PathBuf),
}

impl WatchEvent {
    /// Path the event refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::ContentModified(path)
            | Self::StyleModified(path)
            | Self::Created(path)
            | Self::Deleted(path)
            | Self::Modified(path) => path,
        }
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch the given files and directories.
    ///
    /// Files are watched through their parent directory so editors that
    /// replace the file on save are still seen. Missing paths are skipped.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.is_dir() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            } else if path.is_file() {
                let parent = match path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                watcher
                    .watch(parent, RecursiveMode::NonRecursive)
                    .map_err(std::io::Error::other)?;
            } else {
                tracing::debug!("Not watching missing path {}", path.display());
            }
        }

        std::thread::spawn(move || {
            let mut last_event_time = std::time::Instant::now();
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                // Editors emit several events per save
                let now = std::time::Instant::now();
                if now.duration_since(last_event_time) < debounce_duration {
                    continue;
                }
                last_event_time = now;

                for path in event.paths {
                    if let Some(e) = classify_event(&path, &event.kind) {
                        let _ = async_tx.blocking_send(e);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let path = path.to_path_buf();

    match kind {
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path)),
        EventKind::Create(_) | EventKind::Modify(_) => match ext {
            "json" => Some(WatchEvent::ContentModified(path)),
            "css" => Some(WatchEvent::StyleModified(path)),
            _ if matches!(kind, EventKind::Create(_)) => Some(WatchEvent::Created(path)),
            _ => Some(WatchEvent::Modified(path)),
        },
        _ => None,
    }
}
