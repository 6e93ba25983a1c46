//! Collaborators the minimap is wired to
//!
//! The minimap never owns the editor. It reads text from a [`TextSource`],
//! scroll geometry from a [`ViewportSource`], and pushes its output into a
//! [`DisplaySurface`]. Sources announce changes through subscriptions that
//! return a [`Subscription`] guard; dropping the guard unsubscribes.
//!
//! [`EventEmitter`] is the building block sources use to hand out those
//! subscriptions. Callbacks are held weakly by the emitter and strongly by the
//! guard, so a dropped guard is never called again and dead entries are
//! pruned on the next emit.

use super::render::MinimapLine;
use super::scroll::{ContainerExtent, ScrollInfo};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

// ─────────────────────────────────────────────────────────────────────────────
// Subscriptions
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps a callback registered while alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    /// A subscription that is not attached to anything.
    pub fn detached() -> Self {
        Self { guard: None }
    }

    /// Whether the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Unsubscribe now instead of waiting for drop.
    pub fn cancel(mut self) {
        self.guard.take();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

type Callback<E> = Rc<dyn Fn(&E)>;

/// A list of listeners for events of type `E`.
pub struct EventEmitter<E> {
    listeners: RefCell<Vec<Weak<dyn Fn(&E)>>>,
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<E: 'static> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E: 'static> EventEmitter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it stays registered while the returned guard lives.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let strong: Callback<E> = Rc::new(callback);
        self.listeners.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            guard: Some(Box::new(strong)),
        }
    }

    /// Call every live listener in registration order.
    ///
    /// Listeners are collected before any is invoked, so a callback may
    /// subscribe, unsubscribe or emit again without a borrow conflict.
    pub fn emit(&self, event: &E) {
        let live: Vec<Callback<E>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in live {
            callback(event);
        }
    }

    /// Registered listeners, including dropped ones not yet pruned.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Listeners whose guard is still alive.
    pub fn live_listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborator Traits
// ─────────────────────────────────────────────────────────────────────────────

/// Where the document text comes from.
pub trait TextSource {
    /// Current content, one entry per line.
    fn lines(&self) -> Vec<String>;

    /// Call `callback` after every content mutation.
    fn on_change(&self, callback: Box<dyn Fn()>) -> Subscription;
}

/// The editor viewport the minimap follows.
pub trait ViewportSource {
    /// Current scroll offset and extents.
    fn scroll_info(&self) -> ScrollInfo;

    /// Call `callback` after every scroll.
    fn on_scroll(&self, callback: Box<dyn Fn()>) -> Subscription;
}

/// Where the minimap is drawn.
pub trait DisplaySurface {
    /// Replace all displayed rows.
    fn show_lines(&mut self, lines: &[MinimapLine]);

    /// Size of the scrollable minimap container.
    fn extent(&self) -> ContainerExtent;

    /// Scroll the minimap container to `offset`.
    fn set_scroll_top(&mut self, offset: f32);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_listeners_in_order() {
        let emitter = EventEmitter::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let seen = Rc::clone(&seen);
            emitter.subscribe(move |v| seen.borrow_mut().push(("first", *v)))
        };
        let second = {
            let seen = Rc::clone(&seen);
            emitter.subscribe(move |v| seen.borrow_mut().push(("second", *v)))
        };

        emitter.emit(&7);
        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
        assert!(first.is_active());
        assert!(second.is_active());
    }

    #[test]
    fn test_dropped_subscription_is_not_called() {
        let emitter = EventEmitter::<()>::new();
        let hits = Rc::new(Cell::new(0));

        let sub = {
            let hits = Rc::clone(&hits);
            emitter.subscribe(move |_| hits.set(hits.get() + 1))
        };
        emitter.emit(&());
        drop(sub);
        emitter.emit(&());

        assert_eq!(hits.get(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_cancel_unsubscribes() {
        let emitter = EventEmitter::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = Rc::clone(&hits);
            emitter.subscribe(move |_| hits.set(hits.get() + 1))
        };
        assert_eq!(emitter.live_listener_count(), 1);

        sub.cancel();
        assert_eq!(emitter.live_listener_count(), 0);
        emitter.emit(&());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_callback_may_emit_reentrantly() {
        let emitter = Rc::new(EventEmitter::<u32>::new());
        let total = Rc::new(Cell::new(0));

        let _sub = {
            let emitter_ref = Rc::downgrade(&emitter);
            let total = Rc::clone(&total);
            emitter.subscribe(move |depth| {
                total.set(total.get() + 1);
                if *depth > 0 {
                    if let Some(emitter) = emitter_ref.upgrade() {
                        emitter.emit(&(depth - 1));
                    }
                }
            })
        };

        emitter.emit(&2);
        assert_eq!(total.get(), 3);
    }

    #[test]
    fn test_debug_reports_listener_count() {
        let emitter = EventEmitter::<()>::new();
        let _sub = emitter.subscribe(|_| {});
        assert_eq!(format!("{:?}", emitter), "EventEmitter { listeners: 1 }");
    }

    #[test]
    fn test_detached_subscription() {
        let sub = Subscription::detached();
        assert!(!sub.is_active());
        sub.cancel();
    }
}
