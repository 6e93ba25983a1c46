//! User settings for the minimap viewer
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::error::Result;
use crate::minimap::SyncOptions;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// Cycle Light → Dark → System.
    pub fn next(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Panel Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Which side of the editor the minimap panel appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelSide {
    Left,
    /// Minimap on the right side (default)
    #[default]
    Right,
}

impl PanelSide {
    pub fn toggle(&self) -> Self {
        match self {
            PanelSide::Left => PanelSide::Right,
            PanelSide::Right => PanelSide::Left,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PanelSide::Left => "Left",
            PanelSide::Right => "Right",
        }
    }
}

/// Minimap panel options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapSettings {
    /// Whether the panel is shown
    pub visible: bool,
    /// Side of the editor the panel is docked to
    pub side: PanelSide,
    /// Panel width in pixels
    pub width: f32,
    /// Font size of the miniature rows
    pub font_size: f32,
    /// Follow the editor's scroll position
    pub sync_scroll: bool,
}

impl Default for MinimapSettings {
    fn default() -> Self {
        Self {
            visible: true,
            side: PanelSide::Right,
            width: 140.0,
            font_size: 3.0,
            sync_scroll: true,
        }
    }
}

impl From<&MinimapSettings> for SyncOptions {
    fn from(settings: &MinimapSettings) -> Self {
        SyncOptions {
            sync_scroll: settings.sync_scroll,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            x: None,
            y: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// All persisted user preferences.
///
/// Missing fields fall back to their defaults when loading, and unknown
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Color theme
    pub theme: Theme,
    /// Font size of the main editor
    pub editor_font_size: f32,
    /// Last window geometry
    pub window_size: WindowSize,
    /// Minimap panel options
    pub minimap: MinimapSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            editor_font_size: 14.0,
            window_size: WindowSize::default(),
            minimap: MinimapSettings::default(),
        }
    }
}

impl Settings {
    /// Minimum allowed editor font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed editor font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum minimap font size.
    pub const MIN_MINIMAP_FONT_SIZE: f32 = 1.0;
    /// Maximum minimap font size.
    pub const MAX_MINIMAP_FONT_SIZE: f32 = 12.0;
    /// Minimum minimap panel width.
    pub const MIN_MINIMAP_WIDTH: f32 = 80.0;
    /// Maximum minimap panel width.
    pub const MAX_MINIMAP_WIDTH: f32 = 400.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Non-finite numbers (possible in hand-edited files) reset to defaults.
    pub fn sanitize(&mut self) {
        let defaults = Settings::default();

        self.editor_font_size = clamp_or(
            self.editor_font_size,
            Self::MIN_FONT_SIZE,
            Self::MAX_FONT_SIZE,
            defaults.editor_font_size,
        );

        self.minimap.font_size = clamp_or(
            self.minimap.font_size,
            Self::MIN_MINIMAP_FONT_SIZE,
            Self::MAX_MINIMAP_FONT_SIZE,
            defaults.minimap.font_size,
        );
        self.minimap.width = clamp_or(
            self.minimap.width,
            Self::MIN_MINIMAP_WIDTH,
            Self::MAX_MINIMAP_WIDTH,
            defaults.minimap.width,
        );

        self.window_size.width = clamp_or(
            self.window_size.width,
            Self::MIN_WINDOW_SIZE,
            Self::MAX_WINDOW_SIZE,
            defaults.window_size.width,
        );
        self.window_size.height = clamp_or(
            self.window_size.height,
            Self::MIN_WINDOW_SIZE,
            Self::MAX_WINDOW_SIZE,
            defaults.window_size.height,
        );
    }

    /// Parse settings from JSON and sanitize them.
    ///
    /// Invalid JSON is reported as `Error::ConfigParse`.
    pub fn from_json_sanitized(json: &str) -> Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.editor_font_size, 14.0);
        assert!(settings.minimap.visible);
        assert!(settings.minimap.sync_scroll);
        assert_eq!(settings.minimap.side, PanelSide::Right);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(theme, Theme::System);
    }

    #[test]
    fn test_theme_cycle() {
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::System);
        assert_eq!(Theme::System.next(), Theme::Light);
    }

    #[test]
    fn test_panel_side_toggle() {
        assert_eq!(PanelSide::Left.toggle(), PanelSide::Right);
        assert_eq!(PanelSide::Right.toggle(), PanelSide::Left);
        assert_eq!(PanelSide::Left.label(), "Left");
    }

    #[test]
    fn test_partial_minimap_section_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"minimap": {"side": "left"}}"#).unwrap();
        assert_eq!(settings.minimap.side, PanelSide::Left);
        assert_eq!(settings.minimap.width, MinimapSettings::default().width);
        assert!(settings.minimap.sync_scroll);
    }

    #[test]
    fn test_sanitize_clamps_ranges() {
        let mut settings = Settings::default();
        settings.editor_font_size = 2.0;
        settings.minimap.font_size = 50.0;
        settings.minimap.width = 10.0;
        settings.window_size.width = 1.0e6;
        settings.sanitize();

        assert_eq!(settings.editor_font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.minimap.font_size, Settings::MAX_MINIMAP_FONT_SIZE);
        assert_eq!(settings.minimap.width, Settings::MIN_MINIMAP_WIDTH);
        assert_eq!(settings.window_size.width, Settings::MAX_WINDOW_SIZE);
    }

    #[test]
    fn test_sanitize_replaces_non_finite() {
        let mut settings = Settings::default();
        settings.minimap.width = f32::NAN;
        settings.editor_font_size = f32::INFINITY;
        settings.sanitize();

        assert_eq!(settings.minimap.width, MinimapSettings::default().width);
        assert_eq!(settings.editor_font_size, 14.0);
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings =
            Settings::from_json_sanitized(r#"{"editor_font_size": 4.0, "theme": "dark"}"#)
                .unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.editor_font_size, Settings::MIN_FONT_SIZE);
    }

    #[test]
    fn test_from_json_sanitized_rejects_invalid_json() {
        let result = Settings::from_json_sanitized("{ theme: ");
        assert!(matches!(result, Err(crate::Error::ConfigParse { .. })));
    }

    #[test]
    fn test_sync_options_from_settings() {
        let mut minimap = MinimapSettings::default();
        minimap.sync_scroll = false;
        let options = SyncOptions::from(&minimap);
        assert!(!options.sync_scroll);
    }
}
