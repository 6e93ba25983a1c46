//! The document mirrored by the minimap
//!
//! A `Document` owns the full text of one file (or an unsaved buffer) and is
//! the [`TextSource`] the minimap subscribes to. Every replacement of the text
//! notifies subscribers, even if the new text is identical.

use crate::error::{Error, Result};
use crate::minimap::{count_lines, split_lines, EventEmitter, Subscription, TextSource};
use log::{debug, info};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Name shown for documents that are not backed by a file.
const UNTITLED: &str = "Untitled";

/// A text buffer with change notification.
#[derive(Debug)]
pub struct Document {
    text: RefCell<String>,
    /// Text as last read from disk
    saved: RefCell<String>,
    path: Option<PathBuf>,
    changed: EventEmitter<()>,
}

impl Document {
    /// Create an in-memory document.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            saved: RefCell::new(text.clone()),
            text: RefCell::new(text),
            path: None,
            changed: EventEmitter::new(),
        }
    }

    /// Load a document from disk.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let text = read_text(&path)?;
        info!(
            "Opened {} ({} lines)",
            path.display(),
            count_lines(&text)
        );
        Ok(Self {
            saved: RefCell::new(text.clone()),
            text: RefCell::new(text),
            path: Some(path),
            changed: EventEmitter::new(),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name for window titles and the panel header.
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Copy of the full text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn line_count(&self) -> usize {
        count_lines(&self.text.borrow())
    }

    /// Whether the text has been edited since it was opened or reloaded.
    pub fn is_modified(&self) -> bool {
        *self.text.borrow() != *self.saved.borrow()
    }

    /// Replace the whole text and notify subscribers.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
        self.changed.emit(&());
    }

    /// Re-read the backing file and notify subscribers.
    ///
    /// Local edits are discarded; check [`Document::is_modified`] first.
    pub fn reload(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| Error::Application("Document has no file to reload".to_string()))?;
        let text = read_text(path)?;
        debug!("Reloaded {} ({} bytes)", path.display(), text.len());
        *self.saved.borrow_mut() = text.clone();
        self.set_text(text);
        Ok(())
    }
}

impl TextSource for Document {
    fn lines(&self) -> Vec<String> {
        split_lines(&self.text.borrow())
    }

    fn on_change(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.changed.subscribe(move |_| callback())
    }
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
