//! Minimap Side Panel
//!
//! An egui side panel that draws the rendered minimap rows in a small
//! monospace font and acts as the [`DisplaySurface`] for the synchronizer.
//!
//! egui is immediate mode, so the surface cannot scroll itself when the
//! synchronizer asks. Requests are stored and applied on the next
//! [`MinimapPanel::show`], and the container extent reported back is the one
//! measured during the previous frame.

use crate::config::{MinimapSettings, PanelSide};
use crate::minimap::{visible_band, ContainerExtent, DisplaySurface, MinimapLine, ScrollInfo};
use crate::ui::theme::MinimapColors;
use eframe::egui::{self, Align2, FontId, Rect, RichText, ScrollArea, Sense, Vec2};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum width for the minimap panel.
const MIN_PANEL_WIDTH: f32 = 80.0;

/// Maximum width for the minimap panel.
const MAX_PANEL_WIDTH: f32 = 400.0;

/// Extents closer than this are considered unchanged.
const EXTENT_TOLERANCE: f32 = 0.5;

/// Title shown in the panel header.
pub const PANEL_TITLE: &str = "Minimap";

// ─────────────────────────────────────────────────────────────────────────────
// MinimapPanelOutput
// ─────────────────────────────────────────────────────────────────────────────

/// Output from the minimap panel indicating user actions.
#[derive(Debug, Clone, Default)]
pub struct MinimapPanelOutput {
    /// Line index (0-based) that was clicked, for navigation
    pub clicked_line: Option<usize>,
    /// Whether the close button was clicked
    pub close_requested: bool,
    /// New panel width if resized
    pub new_width: Option<f32>,
    /// Whether the measured container extent changed this frame
    pub extent_changed: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// MinimapPanel
// ─────────────────────────────────────────────────────────────────────────────

/// The minimap panel widget.
#[derive(Debug, Clone)]
pub struct MinimapPanel {
    /// Rows currently displayed
    lines: Vec<MinimapLine>,
    /// Offset requested by the synchronizer, applied on the next frame
    pending_offset: Option<f32>,
    /// Current scroll offset of the panel
    offset: f32,
    /// Extent measured during the last frame
    extent: ContainerExtent,
    /// Current panel width
    width: f32,
}

impl Default for MinimapPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl MinimapPanel {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            pending_offset: None,
            offset: 0.0,
            extent: ContainerExtent::default(),
            width: 140.0,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH);
        self
    }

    pub fn lines(&self) -> &[MinimapLine] {
        &self.lines
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Offset the panel is scrolled to (or will be on the next frame).
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Render the panel.
    ///
    /// `primary` is the editor geometry used to mark the visible band.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &MinimapSettings,
        primary: ScrollInfo,
        is_dark: bool,
    ) -> MinimapPanelOutput {
        let mut output = MinimapPanelOutput::default();
        let colors = MinimapColors::for_dark_mode(is_dark);

        let panel = match settings.side {
            PanelSide::Left => egui::SidePanel::left("minimap_panel"),
            PanelSide::Right => egui::SidePanel::right("minimap_panel"),
        };

        panel
            .resizable(true)
            .default_width(self.width)
            .min_width(MIN_PANEL_WIDTH)
            .max_width(MAX_PANEL_WIDTH)
            .frame(
                egui::Frame::none()
                    .fill(colors.background)
                    .stroke(egui::Stroke::new(1.0, colors.border)),
            )
            .show(ctx, |ui| {
                let current_width = ui.available_width();
                if (current_width - self.width).abs() > 1.0 {
                    self.width = current_width;
                    output.new_width = Some(current_width);
                }

                self.show_header(ui, &colors, &mut output);
                ui.separator();
                self.show_rows(ui, settings, primary, &colors, &mut output);
            });

        output
    }

    fn show_header(
        &self,
        ui: &mut egui::Ui,
        colors: &MinimapColors,
        output: &mut MinimapPanelOutput,
    ) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(
                RichText::new(PANEL_TITLE)
                    .size(12.0)
                    .strong()
                    .color(colors.text),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(4.0);
                if ui
                    .add(
                        egui::Button::new(RichText::new("×").size(14.0).color(colors.muted))
                            .frame(false)
                            .min_size(Vec2::new(20.0, 20.0)),
                    )
                    .on_hover_text("Hide minimap (Ctrl+M)")
                    .clicked()
                {
                    output.close_requested = true;
                }
            });
        });
    }

    fn show_rows(
        &mut self,
        ui: &mut egui::Ui,
        settings: &MinimapSettings,
        primary: ScrollInfo,
        colors: &MinimapColors,
        output: &mut MinimapPanelOutput,
    ) {
        let font_id = FontId::monospace(settings.font_size);
        let row_height = ui.fonts(|f| f.row_height(&font_id));
        ui.spacing_mut().item_spacing = Vec2::ZERO;

        let mut scroll_area = ScrollArea::vertical()
            .id_source("minimap_scroll")
            .auto_shrink([false, false]);
        if let Some(offset) = self.pending_offset.take() {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let lines = &self.lines;
        let scroll_output = scroll_area.show_rows(ui, row_height, lines.len(), |ui, rows| {
            let mut clicked = None;
            for index in rows {
                let (rect, response) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), row_height),
                    Sense::click(),
                );
                if response.hovered() {
                    ui.painter().rect_filled(rect, 0.0, colors.hover);
                }
                if let Some(line) = lines.get(index).filter(|l| !l.is_blank()) {
                    ui.painter().text(
                        rect.left_top() + egui::vec2(4.0, 0.0),
                        Align2::LEFT_TOP,
                        &line.text,
                        font_id.clone(),
                        colors.text,
                    );
                }
                if response.clicked() {
                    clicked = Some(index);
                }
            }
            clicked
        });

        if let Some(index) = scroll_output.inner {
            debug!("Minimap: clicked line {}", index + 1);
            output.clicked_line = Some(index);
        }

        let inner_rect = scroll_output.inner_rect;
        let extent = ContainerExtent::new(scroll_output.content_size.y, inner_rect.height());
        output.extent_changed = extent_differs(self.extent, extent);
        self.extent = extent;
        self.offset = scroll_output.state.offset.y;

        if let Some((top, bottom)) = visible_band(primary, extent.content_height) {
            let band = Rect::from_min_max(
                egui::pos2(inner_rect.left(), inner_rect.top() + top - self.offset),
                egui::pos2(inner_rect.right(), inner_rect.top() + bottom - self.offset),
            );
            ui.painter_at(inner_rect)
                .rect_filled(band, 0.0, colors.visible_band);
        }
    }
}

fn extent_differs(a: ContainerExtent, b: ContainerExtent) -> bool {
    (a.content_height - b.content_height).abs() > EXTENT_TOLERANCE
        || (a.viewport_height - b.viewport_height).abs() > EXTENT_TOLERANCE
}

impl DisplaySurface for MinimapPanel {
    fn show_lines(&mut self, lines: &[MinimapLine]) {
        self.lines = lines.to_vec();
    }

    fn extent(&self) -> ContainerExtent {
        self.extent
    }

    fn set_scroll_top(&mut self, offset: f32) {
        self.pending_offset = Some(offset);
        self.offset = offset;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimap::render;

    fn run_frame(panel: &mut MinimapPanel, ctx: &egui::Context) -> MinimapPanelOutput {
        let settings = MinimapSettings::default();
        let mut output = MinimapPanelOutput::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            output = panel.show(ctx, &settings, ScrollInfo::default(), false);
        });
        output
    }

    #[test]
    fn test_show_lines_replaces_rows() {
        let mut panel = MinimapPanel::new();
        panel.show_lines(render(&["a", "b", "c"]).lines());
        assert_eq!(panel.lines().len(), 3);

        panel.show_lines(render(&["only"]).lines());
        assert_eq!(panel.lines().len(), 1);
        assert_eq!(panel.lines()[0].text, "only");
    }

    #[test]
    fn test_set_scroll_top_is_deferred() {
        let mut panel = MinimapPanel::new();
        panel.set_scroll_top(42.0);
        assert_eq!(panel.pending_offset, Some(42.0));
        assert_eq!(panel.offset(), 42.0);
    }

    #[test]
    fn test_with_width_clamps() {
        assert_eq!(MinimapPanel::new().with_width(10.0).width(), MIN_PANEL_WIDTH);
        assert_eq!(MinimapPanel::new().with_width(9999.0).width(), MAX_PANEL_WIDTH);
    }

    #[test]
    fn test_frame_measures_extent() {
        let ctx = egui::Context::default();
        let mut panel = MinimapPanel::new();
        let lines: Vec<String> = (0..500).map(|i| format!("line {}", i)).collect();
        panel.show_lines(render(&lines).lines());
        assert_eq!(panel.extent(), ContainerExtent::default());

        let output = run_frame(&mut panel, &ctx);
        assert!(output.extent_changed);
        assert!(panel.extent().content_height > 0.0);
        assert!(panel.extent().viewport_height > 0.0);

        let again = run_frame(&mut panel, &ctx);
        assert!(!again.extent_changed);
    }

    #[test]
    fn test_extent_differs() {
        let a = ContainerExtent::new(100.0, 50.0);
        assert!(!extent_differs(a, ContainerExtent::new(100.2, 50.0)));
        assert!(extent_differs(a, ContainerExtent::new(120.0, 50.0)));
        assert!(extent_differs(a, ContainerExtent::new(100.0, 10.0)));
    }
}
