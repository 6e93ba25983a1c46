//! Keeps the minimap rendered and scrolled in step with the editor
//!
//! [`Minimap::activate`] takes the three collaborators explicitly, renders
//! once, and subscribes to the text and viewport sources:
//!
//! - text changed → full re-render into the surface
//! - viewport scrolled → proportional scroll of the surface
//!
//! Neither trigger is debounced or throttled. [`Minimap::shutdown`] (or
//! dropping the `Minimap`) releases both subscriptions.

use super::render::{MinimapRenderer, MinimapState};
use super::scroll::map_scroll;
use super::source::{DisplaySurface, Subscription, TextSource, ViewportSource};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Behaviour switches for an active minimap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Follow the editor's scroll position
    pub sync_scroll: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { sync_scroll: true }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared State
// ─────────────────────────────────────────────────────────────────────────────

struct Inner {
    text: Rc<dyn TextSource>,
    viewport: Rc<dyn ViewportSource>,
    surface: Rc<RefCell<dyn DisplaySurface>>,
    renderer: MinimapRenderer,
    options: SyncOptions,
    last_offset: Option<f32>,
}

impl Inner {
    fn render(&mut self) {
        let lines = self.text.lines();
        let state = self.renderer.render(&lines);
        debug!("Minimap rendered {} lines", state.len());
        self.surface.borrow_mut().show_lines(state.lines());
    }

    fn sync_scroll(&mut self) -> Option<f32> {
        if !self.options.sync_scroll {
            return None;
        }
        let primary = self.viewport.scroll_info();
        let mut surface = self.surface.borrow_mut();
        let offset = map_scroll(primary, surface.extent());
        surface.set_scroll_top(offset);
        self.last_offset = Some(offset);
        Some(offset)
    }
}

/// Run `f` against the shared state if the minimap is still alive.
///
/// A notification that arrives while the state is already borrowed (a
/// collaborator emitting from inside one of our own calls) is skipped.
fn with_inner(weak: &Weak<RefCell<Inner>>, f: impl FnOnce(&mut Inner)) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    try_with(&inner, f);
}

/// Run `f` unless the state is already borrowed further up the stack.
fn try_with<R>(inner: &RefCell<Inner>, f: impl FnOnce(&mut Inner) -> R) -> Option<R> {
    match inner.try_borrow_mut() {
        Ok(mut inner) => Some(f(&mut *inner)),
        Err(_) => {
            debug!("Minimap busy, skipping nested call");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Minimap
// ─────────────────────────────────────────────────────────────────────────────

/// An active minimap bound to one text source, viewport and surface.
///
/// The control methods may be called from inside a collaborator callback;
/// a call that would re-enter work already in progress is skipped. The
/// read-only accessors must not be used that way.
pub struct Minimap {
    inner: Rc<RefCell<Inner>>,
    surface: Rc<RefCell<dyn DisplaySurface>>,
    subscriptions: Vec<Subscription>,
}

impl fmt::Debug for Minimap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Minimap")
            .field("lines", &inner.renderer.state().len())
            .field("options", &inner.options)
            .field("last_offset", &inner.last_offset)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl Minimap {
    /// Bind a minimap to its collaborators.
    ///
    /// Returns `None` (after logging a warning) when there is no text source
    /// to mirror. Otherwise the surface is rendered and scrolled immediately.
    pub fn activate(
        text: Option<Rc<dyn TextSource>>,
        viewport: Rc<dyn ViewportSource>,
        surface: Rc<RefCell<dyn DisplaySurface>>,
        options: SyncOptions,
    ) -> Option<Self> {
        let Some(text) = text else {
            warn!("No active text source found, minimap not activated");
            return None;
        };

        let inner = Rc::new(RefCell::new(Inner {
            text: Rc::clone(&text),
            viewport: Rc::clone(&viewport),
            surface: Rc::clone(&surface),
            renderer: MinimapRenderer::new(),
            options,
            last_offset: None,
        }));

        {
            let mut inner = inner.borrow_mut();
            inner.render();
            inner.sync_scroll();
        }

        let on_change = {
            let weak = Rc::downgrade(&inner);
            text.on_change(Box::new(move || with_inner(&weak, Inner::render)))
        };
        let on_scroll = {
            let weak = Rc::downgrade(&inner);
            viewport.on_scroll(Box::new(move || {
                with_inner(&weak, |inner| {
                    inner.sync_scroll();
                })
            }))
        };

        info!(
            "Minimap activated ({} lines, scroll sync {})",
            inner.borrow().renderer.state().len(),
            if options.sync_scroll { "on" } else { "off" }
        );

        Some(Self {
            inner,
            surface,
            subscriptions: vec![on_change, on_scroll],
        })
    }

    /// Unsubscribe from both sources and clear the surface.
    pub fn shutdown(mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
        match self.surface.try_borrow_mut() {
            Ok(mut surface) => surface.show_lines(&[]),
            Err(_) => warn!("Minimap surface busy during shutdown, not cleared"),
        }
        info!("Minimap shut down");
    }

    /// Re-render from the current text, as if a change had been signalled.
    pub fn refresh(&self) {
        try_with(&self.inner, Inner::render);
    }

    /// Apply the scroll mapping now. Returns the offset set on the surface,
    /// or `None` while scroll sync is disabled or the minimap is busy.
    pub fn sync_now(&self) -> Option<f32> {
        try_with(&self.inner, Inner::sync_scroll).flatten()
    }

    pub fn set_sync_scroll(&self, enabled: bool) {
        try_with(&self.inner, |inner| inner.options.sync_scroll = enabled);
    }

    pub fn options(&self) -> SyncOptions {
        self.inner.borrow().options
    }

    /// Snapshot of the current rendered rows.
    pub fn state(&self) -> MinimapState {
        self.inner.borrow().renderer.state().clone()
    }

    pub fn rendered_line_count(&self) -> usize {
        self.inner.borrow().renderer.state().len()
    }

    /// Number of full re-renders since activation, including the first.
    pub fn render_count(&self) -> u64 {
        self.inner.borrow().renderer.render_count()
    }

    /// Offset most recently applied to the surface.
    pub fn last_offset(&self) -> Option<f32> {
        self.inner.borrow().last_offset
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
