// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! TEXTOVERLAY - Text overlay editor
//!
//! A cross-platform desktop application for placing text fields on an image
//! or PDF page and exporting the result as PNG or PDF.

mod app;
mod ui;

use anyhow::Result;
use app::OverlayApp;
use textoverlay::Settings;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = Settings::load_or_default();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("TEXTOVERLAY - Text Overlay Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "TEXTOVERLAY",
        options,
        Box::new(move |_cc| Ok(Box::new(OverlayApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
