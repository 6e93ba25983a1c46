//! Minimap core
//!
//! Renders a text buffer into a miniature, line-for-line copy and keeps the
//! miniature's scroll position proportional to the editor's. Nothing here
//! depends on a UI toolkit; the editor, viewport and drawing surface are
//! supplied through the traits in [`source`].

pub mod render;
pub mod scroll;
pub mod source;
pub mod sync;

pub use render::{count_lines, render, split_lines, MinimapLine, MinimapRenderer, MinimapState};
pub use scroll::{map_scroll, scroll_ratio, visible_band, ContainerExtent, ScrollInfo};
pub use source::{DisplaySurface, EventEmitter, Subscription, TextSource, ViewportSource};
pub use sync::{Minimap, SyncOptions};
