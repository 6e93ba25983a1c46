//! Minimap
//!
//! A scrollable miniature of a text document that stays scrolled in step
//! with the editor showing it. The core in [`minimap`] is toolkit-agnostic;
//! [`ui`] and [`app`] provide an egui viewer built on top of it.

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod minimap;
pub mod ui;
pub mod watcher;

pub use error::{Error, Result};
