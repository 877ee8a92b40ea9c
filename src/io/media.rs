// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background loading (images and PDF pages).
//!
//! Images are decoded directly. PDFs have their first page rasterized at the
//! configured upscaling factor through a [`PageRasterizer`], after which the
//! result is treated like any other bitmap.

use crate::config::Settings;
use crate::error::{OverlayError, Result};
use crate::models::session::BackgroundImage;
use image::RgbaImage;
use std::path::Path;

/// Rasterizes the first page of a PDF file.
pub trait PageRasterizer: Send + Sync {
    fn rasterize_first_page(&self, path: &Path, scale: f32) -> Result<RgbaImage>;
}

/// Rasterizer used when the crate is built without a PDF backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRasterizer;

impl PageRasterizer for UnavailableRasterizer {
    fn rasterize_first_page(&self, path: &Path, _scale: f32) -> Result<RgbaImage> {
        Err(OverlayError::load(
            path,
            "PDF backgrounds require the `pdfium` feature",
        ))
    }
}

#[cfg(feature = "pdfium")]
pub use pdfium_backend::PdfiumRasterizer;

#[cfg(feature = "pdfium")]
mod pdfium_backend {
    use super::*;
    use pdfium_render::prelude::*;

    /// PDFium-backed rasterizer. The library is bound on each call.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct PdfiumRasterizer;

    impl PdfiumRasterizer {
        /// Search order: executable directory, current directory, system paths.
        fn bind() -> std::result::Result<Pdfium, PdfiumError> {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));

            if let Some(ref dir) = exe_dir {
                if let Ok(bindings) =
                    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                {
                    return Ok(Pdfium::new(bindings));
                }
            }

            Ok(Pdfium::new(
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                    .or_else(|_| Pdfium::bind_to_system_library())?,
            ))
        }
    }

    impl PageRasterizer for PdfiumRasterizer {
        fn rasterize_first_page(&self, path: &Path, scale: f32) -> Result<RgbaImage> {
            let pdfium = Self::bind()
                .map_err(|e| OverlayError::load(path, format!("failed to bind pdfium: {}", e)))?;

            let document = pdfium
                .load_pdf_from_file(path, None)
                .map_err(|e| OverlayError::load(path, e))?;

            let pages = document.pages();
            if pages.len() == 0 {
                return Err(OverlayError::load(path, "document has no pages"));
            }
            let page = pages.get(0).map_err(|e| OverlayError::load(path, e))?;

            let width = (page.width().value * scale).round().max(1.0) as i32;
            let height = (page.height().value * scale).round().max(1.0) as i32;
            let config = PdfRenderConfig::new()
                .set_target_width(width)
                .set_target_height(height);

            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| OverlayError::load(path, e))?;

            RgbaImage::from_raw(width as u32, height as u32, bitmap.as_rgba_bytes().to_vec())
                .ok_or_else(|| OverlayError::load(path, "rendered bitmap has unexpected size"))
        }
    }
}

/// The rasterizer for this build.
pub fn default_rasterizer() -> Box<dyn PageRasterizer> {
    #[cfg(feature = "pdfium")]
    {
        Box::new(PdfiumRasterizer)
    }
    #[cfg(not(feature = "pdfium"))]
    {
        Box::new(UnavailableRasterizer)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Load a background from an image file or the first page of a PDF.
pub fn load_background(
    path: &Path,
    settings: &Settings,
    rasterizer: &dyn PageRasterizer,
) -> Result<BackgroundImage> {
    let pixels = if is_pdf(path) {
        rasterizer.rasterize_first_page(path, settings.pdf_raster_scale)?
    } else {
        image::open(path)
            .map_err(|e| OverlayError::load(path, e))?
            .to_rgba8()
    };

    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(OverlayError::load(path, "image has no pixels"));
    }

    log::info!("Loaded background: {} ({}x{})", path.display(), pixels.width(), pixels.height());
    Ok(BackgroundImage::new(pixels, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    struct FixedRasterizer;

    impl PageRasterizer for FixedRasterizer {
        fn rasterize_first_page(&self, _path: &Path, scale: f32) -> Result<RgbaImage> {
            let side = (100.0 * scale) as u32;
            Ok(RgbaImage::from_pixel(side, side, Rgba([255, 255, 255, 255])))
        }
    }

    #[test]
    fn test_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        RgbaImage::from_pixel(40, 30, Rgba([10, 20, 30, 255])).save(&path).unwrap();

        let bg = load_background(&path, &Settings::default(), &UnavailableRasterizer).unwrap();
        assert_eq!((bg.width(), bg.height()), (40, 30));
        assert_eq!(bg.source_path(), path.as_path());
        assert_eq!(*bg.pixels().get_pixel(5, 5), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_pdf_goes_through_rasterizer_at_configured_scale() {
        let bg = load_background(Path::new("form.PDF"), &Settings::default(), &FixedRasterizer).unwrap();
        assert_eq!((bg.width(), bg.height()), (200, 200));
    }

    #[test]
    fn test_pdf_without_backend_is_load_error() {
        let err = load_background(Path::new("form.pdf"), &Settings::default(), &UnavailableRasterizer)
            .unwrap_err();
        assert!(matches!(err, OverlayError::Load { .. }));
    }

    #[test]
    fn test_corrupt_image_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = load_background(&path, &Settings::default(), &UnavailableRasterizer).unwrap_err();
        assert!(matches!(err, OverlayError::Load { .. }));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_background(Path::new("/definitely/not/here.jpg"), &Settings::default(), &UnavailableRasterizer)
            .unwrap_err();
        assert!(matches!(err, OverlayError::Load { .. }));
    }
}
