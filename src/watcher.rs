//! File system watcher for the open document.
//!
//! Watches the directory containing the document (editors often save by
//! writing a new file and renaming it over the old one) and reports events
//! for the document's own path only.

use crate::error::{Error, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

/// File system events for the watched document.
#[derive(Debug, Clone, PartialEq)]
pub enum FileEvent {
    /// The document was written or recreated on disk
    Modified,
    /// The document was deleted
    Removed,
    /// The watcher encountered an error
    Error(String),
}

/// Watches a single document file.
#[derive(Debug)]
pub struct FileWatcher {
    /// The internal notify watcher
    _watcher: RecommendedWatcher,
    /// Receiver for file system events
    receiver: Receiver<FileEvent>,
    /// Path being watched
    path: PathBuf,
}

impl FileWatcher {
    /// Start watching `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = channel();

        let target = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| {
                Self::handle_event(result, &target, &tx);
            },
            Config::default().with_poll_interval(Duration::from_millis(500)),
        )
        .map_err(|e| Error::Watch {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let dir = watch_root(&path);
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch {
                path: dir.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            path,
        })
    }

    /// Handle a raw notify event and forward the ones about our file.
    fn handle_event(
        result: std::result::Result<Event, notify::Error>,
        target: &Path,
        tx: &Sender<FileEvent>,
    ) {
        match result {
            Ok(event) => {
                if let Some(file_event) = classify(&event, target) {
                    let _ = tx.send(file_event);
                }
            }
            Err(e) => {
                let _ = tx.send(FileEvent::Error(e.to_string()));
            }
        }
    }

    /// Poll for pending events. Non-blocking.
    pub fn poll_events(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Directory to register with the backend for `path`.
fn watch_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Map a raw event to a document event, ignoring other files.
fn classify(event: &Event, target: &Path) -> Option<FileEvent> {
    let name = target.file_name();
    let touches_target = event
        .paths
        .iter()
        .any(|p| p == target || (name.is_some() && p.file_name() == name));
    if !touches_target {
        return None;
    }

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(FileEvent::Modified),
        EventKind::Remove(_) => Some(FileEvent::Removed),
        // Access and other events don't change the text
        _ => None,
    }
}

/// Collapse a burst of events into the one that matters for a reload.
///
/// A removal wins over modifications; errors are passed through.
pub fn coalesce(events: Vec<FileEvent>) -> Vec<FileEvent> {
    let mut result: Vec<FileEvent> = events
        .iter()
        .filter(|e| matches!(e, FileEvent::Error(_)))
        .cloned()
        .collect();

    if events.contains(&FileEvent::Removed) {
        result.push(FileEvent::Removed);
    } else if events.contains(&FileEvent::Modified) {
        result.push(FileEvent::Modified);
    }
    result
}
