// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! End-to-end workflow: load a background, edit, export, save, reopen.

use image::{Rgba, RgbaImage};
use std::path::Path;
use textoverlay::config::{FontSettings, PageSize};
use textoverlay::io::fonts::FontResolver;
use textoverlay::io::media::{self, PageRasterizer};
use textoverlay::io::serialization;
use textoverlay::render::{pdf, raster};
use textoverlay::{DragController, LayoutSession, OverlayError, PointerEvent, Settings};

/// Stands in for the PDF backend with a blank page at the requested scale.
struct BlankPageRasterizer;

impl PageRasterizer for BlankPageRasterizer {
    fn rasterize_first_page(&self, _path: &Path, scale: f32) -> textoverlay::Result<RgbaImage> {
        let width = (400.0 * scale) as u32;
        let height = (300.0 * scale) as u32;
        Ok(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_background(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba([240, 240, 240, 255]))
        .save(&path)
        .unwrap();
    path
}

fn fonts() -> FontResolver {
    FontResolver::new(&FontSettings {
        search_dirs: Vec::new(),
        candidates: Vec::new(),
    })
}

#[test]
fn test_full_workflow_roundtrip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::default();
    let bg_path = write_background(dir.path(), "form.png", 800, 600);

    let mut session = LayoutSession::new();
    let background = media::load_background(&bg_path, &settings, &BlankPageRasterizer).unwrap();
    session.set_background(background);

    session.add_element(300.0, 250.0, 200.0, 40.0, "Name", 20);
    session.add_element(100.0, 100.0, 150.0, 40.0, "Date", 16);

    let mut drag = DragController::new();
    drag.handle_pointer(&mut session, PointerEvent::down(110.0, 110.0));
    drag.handle_pointer(&mut session, PointerEvent::moved(130.0, 115.0));
    drag.handle_pointer(&mut session, PointerEvent::moved(140.0, 140.0));
    drag.handle_pointer(&mut session, PointerEvent::up(140.0, 140.0));
    assert_eq!(session.selected_id(), Some(1));
    assert_eq!((session.elements()[1].x, session.elements()[1].y), (130.0, 130.0));

    let png_path = dir.path().join("out.png");
    raster::export_png(&session, &fonts(), &png_path).unwrap();
    let png = image::open(&png_path).unwrap();
    assert_eq!((png.width(), png.height()), (800, 600));

    let pdf_path = dir.path().join("out.pdf");
    pdf::export_pdf(&session, PageSize::A4, &pdf_path).unwrap();
    assert!(std::fs::metadata(&pdf_path).unwrap().len() > 0);

    let project_path = dir.path().join("project.json");
    serialization::save_project(&session, &project_path).unwrap();
    let reopened = serialization::open_project(&project_path, &settings, &BlankPageRasterizer).unwrap();

    assert_eq!(reopened.elements(), session.elements());
    assert_eq!(reopened.selected_id(), Some(1));
    let bg = reopened.background().unwrap();
    assert_eq!((bg.width(), bg.height()), (800, 600));
}

#[test]
fn test_reopen_after_background_deleted() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::default();
    let bg_path = write_background(dir.path(), "scan.png", 64, 64);

    let mut session = LayoutSession::new();
    session.set_background(media::load_background(&bg_path, &settings, &BlankPageRasterizer).unwrap());
    session.add_element(1.0, 2.0, 30.0, 10.0, "x", 10);

    let project_path = dir.path().join("project.json");
    serialization::save_project(&session, &project_path).unwrap();
    std::fs::remove_file(&bg_path).unwrap();

    let reopened = serialization::open_project(&project_path, &settings, &BlankPageRasterizer).unwrap();
    assert!(reopened.background().is_none());
    assert_eq!(reopened.elements(), session.elements());

    let out = dir.path().join("out.png");
    assert!(matches!(
        raster::export_png(&reopened, &fonts(), &out),
        Err(OverlayError::NoBackground)
    ));
    assert!(!out.exists());
}

#[test]
fn test_pdf_background_is_upscaled() {
    init_logging();
    let settings = Settings::default();
    let background = media::load_background(Path::new("form.pdf"), &settings, &BlankPageRasterizer).unwrap();
    assert_eq!((background.width(), background.height()), (800, 600));
}

#[test]
fn test_failed_background_load_keeps_session() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::default();
    let bg_path = write_background(dir.path(), "ok.png", 20, 10);

    let mut session = LayoutSession::new();
    session.set_background(media::load_background(&bg_path, &settings, &BlankPageRasterizer).unwrap());

    let broken = dir.path().join("broken.jpg");
    std::fs::write(&broken, b"\xff\xd8 truncated").unwrap();
    let result = media::load_background(&broken, &settings, &BlankPageRasterizer);
    assert!(matches!(result, Err(OverlayError::Load { .. })));
    assert_eq!(session.background().map(|b| b.source_path().to_path_buf()), Some(bg_path));
}
