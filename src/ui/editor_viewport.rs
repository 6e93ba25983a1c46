//! Scroll feed from the editor's `ScrollArea`
//!
//! egui reports the editor geometry once per frame. `EditorViewport` keeps
//! the latest value and signals a scroll only when it actually moved.

use crate::minimap::{EventEmitter, ScrollInfo, Subscription, ViewportSource};
use eframe::egui::scroll_area::ScrollAreaOutput;
use std::cell::Cell;

/// Changes smaller than this (in pixels) are float noise, not scrolling.
const GEOMETRY_TOLERANCE: f32 = 0.01;

/// The [`ViewportSource`] for the viewer's text editor.
#[derive(Debug, Default)]
pub struct EditorViewport {
    info: Cell<ScrollInfo>,
    scrolled: EventEmitter<()>,
}

impl EditorViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the geometry measured this frame and notify subscribers if it
    /// changed. Returns whether a notification was sent.
    pub fn update(&self, info: ScrollInfo) -> bool {
        let previous = self.info.replace(info);
        if geometry_changed(previous, info) {
            self.scrolled.emit(&());
            true
        } else {
            false
        }
    }

    /// Record the geometry of an egui scroll area after it was shown.
    pub fn update_from_output<R>(&self, output: &ScrollAreaOutput<R>) -> bool {
        self.update(ScrollInfo::new(
            output.state.offset.y,
            output.content_size.y,
            output.inner_rect.height(),
        ))
    }
}

fn geometry_changed(a: ScrollInfo, b: ScrollInfo) -> bool {
    (a.top - b.top).abs() > GEOMETRY_TOLERANCE
        || (a.height - b.height).abs() > GEOMETRY_TOLERANCE
        || (a.client_height - b.client_height).abs() > GEOMETRY_TOLERANCE
}

impl ViewportSource for EditorViewport {
    fn scroll_info(&self) -> ScrollInfo {
        self.info.get()
    }

    fn on_scroll(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.scrolled.subscribe(move |_| callback())
    }
}
