//! UI components for the minimap viewer
//!
//! The egui side of the minimap: the panel that serves as the display
//! surface, the editor scroll feed, and theme handling.

mod editor_viewport;
mod minimap_panel;
mod theme;

pub use editor_viewport::EditorViewport;
pub use minimap_panel::{MinimapPanel, MinimapPanelOutput, PANEL_TITLE};
pub use theme::{MinimapColors, ThemeManager};
