// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Three coordinate spaces meet here: screen points in the host's canvas,
//! background pixels (origin top-left, Y down), and PDF points (origin
//! bottom-left, Y up).

/// Axis-aligned rectangle where a background is displayed on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Largest size with the image's aspect ratio that fits the available area.
pub fn fit_within(image_width: u32, image_height: u32, available_width: f64, available_height: f64) -> (f64, f64) {
    let img_aspect = image_width as f64 / image_height.max(1) as f64;
    let available_aspect = available_width / available_height.max(f64::EPSILON);

    if img_aspect > available_aspect {
        // Image is wider - fit to width
        (available_width, available_width / img_aspect)
    } else {
        // Image is taller - fit to height
        (available_height * img_aspect, available_height)
    }
}

/// Convert a screen position to background pixel coordinates.
///
/// Points outside the display rectangle map outside the background; no
/// clamping is applied.
pub fn screen_to_image(screen_x: f64, screen_y: f64, rect: &DisplayRect, width: u32, height: u32) -> (f64, f64) {
    (
        (screen_x - rect.x) * width as f64 / rect.width,
        (screen_y - rect.y) * height as f64 / rect.height,
    )
}

/// Convert background pixel coordinates to a screen position.
pub fn image_to_screen(pixel_x: f64, pixel_y: f64, rect: &DisplayRect, width: u32, height: u32) -> (f64, f64) {
    (
        rect.x + pixel_x * rect.width / width as f64,
        rect.y + pixel_y * rect.height / height as f64,
    )
}

/// Project background pixel coordinates onto a PDF page.
///
/// X and Y are scaled independently, matching a background stretched to the
/// full page, and Y is flipped to the bottom-left origin.
pub fn pixel_to_pdf(
    pixel_x: f64,
    pixel_y: f64,
    background_width: u32,
    background_height: u32,
    page_width: f64,
    page_height: f64,
) -> (f64, f64) {
    (
        pixel_x * page_width / background_width as f64,
        page_height - pixel_y * page_height / background_height as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_image_roundtrip() {
        let rect = DisplayRect { x: 40.0, y: 12.0, width: 960.0, height: 540.0 };
        let (px, py) = screen_to_image(520.0, 282.0, &rect, 1920, 1080);
        assert!((px - 960.0).abs() < 0.0001);
        assert!((py - 540.0).abs() < 0.0001);

        let (sx, sy) = image_to_screen(px, py, &rect, 1920, 1080);
        assert!((sx - 520.0).abs() < 0.0001);
        assert!((sy - 282.0).abs() < 0.0001);
    }

    #[test]
    fn test_screen_outside_rect_is_not_clamped() {
        let rect = DisplayRect { x: 0.0, y: 0.0, width: 100.0, height: 100.0 };
        let (px, py) = screen_to_image(-10.0, 150.0, &rect, 200, 200);
        assert_eq!(px, -20.0);
        assert_eq!(py, 300.0);
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let (w, h) = fit_within(1920, 1080, 960.0, 960.0);
        assert_eq!(w, 960.0);
        assert!((h - 540.0).abs() < 0.0001);
        assert_eq!(fit_within(600, 1200, 800.0, 600.0), (300.0, 600.0));
    }

    #[test]
    fn test_pixel_to_pdf_a4() {
        let (x, y) = pixel_to_pdf(300.0, 250.0, 800, 600, 595.0, 842.0);
        assert!((x - 223.125).abs() < 1e-9);
        assert!((y - 491.1667).abs() < 1e-3);
    }

    #[test]
    fn test_pixel_to_pdf_corners() {
        assert_eq!(pixel_to_pdf(0.0, 0.0, 800, 600, 595.0, 842.0), (0.0, 842.0));
        assert_eq!(pixel_to_pdf(800.0, 600.0, 800, 600, 595.0, 842.0), (595.0, 0.0));
    }
}
