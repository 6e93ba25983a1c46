//! Theme handling for the viewer
//!
//! Applies the configured [`Theme`] to the egui context and provides the
//! colors the minimap panel paints with.

use crate::config::Theme;
use eframe::egui::{Color32, Context, Visuals};
use log::debug;

/// Colors used by the minimap panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapColors {
    pub background: Color32,
    pub border: Color32,
    pub text: Color32,
    pub muted: Color32,
    /// Fill of the band marking the editor's visible region
    pub visible_band: Color32,
    pub hover: Color32,
}

impl MinimapColors {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(250, 250, 250),
            border: Color32::from_rgb(210, 210, 210),
            text: Color32::from_rgb(90, 90, 90),
            muted: Color32::from_rgb(120, 120, 120),
            visible_band: Color32::from_rgba_unmultiplied(60, 120, 220, 40),
            hover: Color32::from_rgb(235, 235, 240),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(35, 35, 35),
            border: Color32::from_rgb(60, 60, 60),
            text: Color32::from_rgb(170, 170, 170),
            muted: Color32::from_rgb(130, 130, 130),
            visible_band: Color32::from_rgba_unmultiplied(140, 170, 230, 45),
            hover: Color32::from_rgb(50, 50, 55),
        }
    }

    pub fn for_dark_mode(is_dark: bool) -> Self {
        if is_dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Tracks the configured theme and reapplies it when it changes.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    needs_apply: bool,
    last_system_dark_mode: Option<bool>,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            current_theme: theme,
            needs_apply: true,
            last_system_dark_mode: None,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.current_theme {
            self.current_theme = theme;
            self.needs_apply = true;
        }
    }

    /// Apply the theme if it changed (or the system preference changed while
    /// following the system). Returns `true` if visuals were updated.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if self.current_theme == Theme::System {
            let system_dark = ctx.style().visuals.dark_mode;
            if self.last_system_dark_mode != Some(system_dark) {
                self.last_system_dark_mode = Some(system_dark);
                self.needs_apply = true;
            }
        }

        if !self.needs_apply {
            return false;
        }

        let visuals = match self.current_theme {
            Theme::Light => Visuals::light(),
            Theme::Dark => Visuals::dark(),
            Theme::System => {
                if ctx.style().visuals.dark_mode {
                    Visuals::dark()
                } else {
                    Visuals::light()
                }
            }
        };
        ctx.set_visuals(visuals);
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
        true
    }

    /// Whether the effective theme is dark.
    pub fn is_dark(&self, ctx: &Context) -> bool {
        match self.current_theme {
            Theme::Dark => true,
            Theme::Light => false,
            Theme::System => ctx.style().visuals.dark_mode,
        }
    }
}
