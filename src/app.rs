//! Main application state and UI for the minimap viewer
//!
//! Hosts one document in a plain text editor with the minimap panel docked
//! beside it. The app owns the collaborators (document, editor viewport,
//! panel) and wires them together through [`Minimap::activate`].

use crate::config::{save_config_silent, Settings};
use crate::document::Document;
use crate::minimap::{DisplaySurface, Minimap, ScrollInfo, SyncOptions, TextSource, ViewportSource};
use crate::ui::{EditorViewport, MinimapPanel, ThemeManager, PANEL_TITLE};
use crate::watcher::{coalesce, FileEvent, FileWatcher};
use eframe::egui::{self, FontId, RichText, ScrollArea, TextEdit};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Application name used in the window title.
pub const APP_NAME: &str = "Minimap";

/// How often to poll the file watcher while a file is open.
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The viewer application.
pub struct MinimapApp {
    settings: Settings,
    theme_manager: ThemeManager,
    /// The open document, if one could be loaded
    document: Option<Rc<Document>>,
    /// Text edited by the `TextEdit`, pushed into the document on change
    editor_text: String,
    viewport: Rc<EditorViewport>,
    panel: Rc<RefCell<MinimapPanel>>,
    minimap: Option<Minimap>,
    watcher: Option<FileWatcher>,
    /// Editor offset to jump to on the next frame (minimap navigation)
    scroll_editor_to: Option<f32>,
    /// Message shown in the status bar
    status: Option<String>,
}

impl MinimapApp {
    /// Create the app. `document` is `None` when the requested file could not
    /// be opened; the minimap then stays inactive.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        document: Option<Document>,
        status: Option<String>,
    ) -> Self {
        info!("Initializing {}", APP_NAME);

        let mut theme_manager = ThemeManager::new(settings.theme);
        theme_manager.apply_if_needed(&cc.egui_ctx);

        let document = document.map(Rc::new);
        let editor_text = document.as_ref().map(|d| d.text()).unwrap_or_default();

        let watcher = document
            .as_ref()
            .and_then(|d| d.path())
            .and_then(|path| match FileWatcher::new(path) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    warn!("{}. Changes on disk will not be picked up.", e);
                    None
                }
            });

        let panel = MinimapPanel::new().with_width(settings.minimap.width);

        let mut app = Self {
            settings,
            theme_manager,
            document,
            editor_text,
            viewport: Rc::new(EditorViewport::new()),
            panel: Rc::new(RefCell::new(panel)),
            minimap: None,
            watcher,
            scroll_editor_to: None,
            status,
        };

        if app.settings.minimap.visible {
            app.activate_minimap();
        }
        app
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Minimap lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    fn activate_minimap(&mut self) {
        if self.minimap.is_some() {
            return;
        }
        let text = self
            .document
            .as_ref()
            .map(|d| Rc::clone(d) as Rc<dyn TextSource>);
        let viewport: Rc<dyn ViewportSource> = self.viewport.clone();
        let surface: Rc<RefCell<dyn DisplaySurface>> = self.panel.clone();

        self.minimap = Minimap::activate(
            text,
            viewport,
            surface,
            SyncOptions::from(&self.settings.minimap),
        );
    }

    fn shutdown_minimap(&mut self) {
        if let Some(minimap) = self.minimap.take() {
            minimap.shutdown();
        }
    }

    fn set_minimap_visible(&mut self, visible: bool) {
        self.settings.minimap.visible = visible;
        if visible {
            self.activate_minimap();
        } else {
            self.shutdown_minimap();
        }
    }

    fn set_sync_scroll(&mut self, enabled: bool) {
        self.settings.minimap.sync_scroll = enabled;
        if let Some(minimap) = &self.minimap {
            minimap.set_sync_scroll(enabled);
            minimap.sync_now();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frame steps
    // ─────────────────────────────────────────────────────────────────────────

    fn window_title(&self) -> String {
        match &self.document {
            Some(doc) => format!("{} - {}", doc.display_name(), APP_NAME),
            None => APP_NAME.to_string(),
        }
    }

    fn handle_file_watcher_events(&mut self, ctx: &egui::Context) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        ctx.request_repaint_after(WATCH_POLL_INTERVAL);

        for event in coalesce(watcher.poll_events()) {
            match event {
                FileEvent::Modified => {
                    let Some(doc) = &self.document else {
                        continue;
                    };
                    if doc.is_modified() {
                        warn!(
                            "{} changed on disk, keeping unsaved edits",
                            doc.display_name()
                        );
                        self.status =
                            Some("File changed on disk; unsaved edits kept".to_string());
                        continue;
                    }
                    match doc.reload() {
                        Ok(()) => {
                            self.editor_text = doc.text();
                            info!("Reloaded {} after external change", doc.display_name());
                        }
                        Err(e) => error!("{}", e),
                    }
                }
                FileEvent::Removed => {
                    warn!("{} was removed on disk", watcher.path().display());
                    self.status = Some("File was removed on disk".to_string());
                }
                FileEvent::Error(message) => warn!("File watcher error: {}", message),
            }
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let toggle_minimap = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::M));
        if toggle_minimap {
            let visible = !self.settings.minimap.visible;
            self.set_minimap_visible(visible);
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut visible = self.settings.minimap.visible;
                if ui.checkbox(&mut visible, PANEL_TITLE).changed() {
                    self.set_minimap_visible(visible);
                }

                let mut sync = self.settings.minimap.sync_scroll;
                if ui.checkbox(&mut sync, "Sync scroll").changed() {
                    self.set_sync_scroll(sync);
                }

                if ui
                    .button(format!("Side: {}", self.settings.minimap.side.label()))
                    .clicked()
                {
                    self.settings.minimap.side = self.settings.minimap.side.toggle();
                }

                if ui
                    .button(format!("Theme: {}", self.settings.theme.label()))
                    .clicked()
                {
                    self.settings.theme = self.settings.theme.next();
                    self.theme_manager.set_theme(self.settings.theme);
                }

                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(RichText::new(status).weak());
                }
            });
        });
    }

    fn render_minimap_panel(&mut self, ctx: &egui::Context) {
        if self.minimap.is_none() {
            return;
        }

        let is_dark = self.theme_manager.is_dark(ctx);
        let primary = self.viewport.scroll_info();
        let output = self
            .panel
            .borrow_mut()
            .show(ctx, &self.settings.minimap, primary, is_dark);

        if let Some(width) = output.new_width {
            self.settings.minimap.width = width;
        }
        if let Some(line) = output.clicked_line {
            self.scroll_editor_to = Some(self.editor_offset_for_line(ctx, line, primary));
        }
        if output.extent_changed {
            // The mapping depends on the panel extent measured this frame
            if let Some(minimap) = &self.minimap {
                minimap.sync_now();
            }
            ctx.request_repaint();
        }
        if output.close_requested {
            self.set_minimap_visible(false);
        }
    }

    /// Editor offset that puts `line` roughly a third of the way down.
    fn editor_offset_for_line(&self, ctx: &egui::Context, line: usize, primary: ScrollInfo) -> f32 {
        let font_id = FontId::monospace(self.settings.editor_font_size);
        let line_height = ctx.fonts(|f| f.row_height(&font_id));
        let target_y = line as f32 * line_height;
        (target_y - primary.client_height / 3.0).max(0.0)
    }

    fn render_editor(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(doc) = self.document.clone() else {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("No document open\n\nUsage: minimap [FILE]")
                            .size(14.0)
                            .weak(),
                    );
                });
                return;
            };

            let mut scroll_area = ScrollArea::vertical()
                .id_source("editor_scroll")
                .auto_shrink([false, false]);
            if let Some(offset) = self.scroll_editor_to.take() {
                debug!("Scrolling editor to offset {}", offset);
                scroll_area = scroll_area.vertical_scroll_offset(offset);
            }

            let font_size = self.settings.editor_font_size;
            let editor_text = &mut self.editor_text;
            let scroll_output = scroll_area.show(ui, |ui| {
                ui.add(
                    TextEdit::multiline(editor_text)
                        .font(FontId::monospace(font_size))
                        .frame(false)
                        .desired_width(f32::INFINITY),
                )
            });

            if scroll_output.inner.changed() {
                doc.set_text(self.editor_text.clone());
            }
            if self.viewport.update_from_output(&scroll_output) {
                // Let the panel apply the new offset on the next frame
                ctx.request_repaint();
            }
        });
    }
}

impl eframe::App for MinimapApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme_manager.apply_if_needed(ctx);

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));

        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window_size.width = rect.width();
            self.settings.window_size.height = rect.height();
        }

        self.handle_file_watcher_events(ctx);
        self.handle_keyboard_shortcuts(ctx);

        // Side panels must be laid out before the central panel
        self.render_top_bar(ctx);
        self.render_minimap_panel(ctx);
        self.render_editor(ctx);
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.shutdown_minimap();
        save_config_silent(&self.settings);
    }
}
