// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Minimap viewer - Main Entry Point
//!
//! Opens a document in a plain editor with a minimap panel beside it.
//!
//! Usage: `minimap [FILE]`

use log::{error, info};
use minimap::app::{MinimapApp, APP_NAME};
use minimap::config::load_config;
use minimap::document::Document;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let window_size = settings.window_size;

    // No argument opens an empty, unsaved document
    let (document, status) = match std::env::args_os().nth(1) {
        Some(path) => match Document::open(&path) {
            Ok(doc) => (Some(doc), None),
            Err(e) => {
                error!("{}", e);
                (None, Some(e.to_string()))
            }
        },
        None => (Some(Document::from_text(String::new())), None),
    };

    let mut viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([400.0, 300.0]);

    if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport = viewport.with_position([x, y]);
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(MinimapApp::new(cc, settings, document, status)))),
    )
}
