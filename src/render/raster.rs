// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster compositor.
//!
//! Draws every element onto a copy of the background bitmap: a 2-pixel
//! outline (red when selected, blue otherwise) and, when present, black text
//! inset from the box's top-left corner.

use super::TEXT_INSET;
use crate::error::{OverlayError, Result};
use crate::io::fonts::FontResolver;
use crate::models::{element::TextElement, session::LayoutSession};
use crate::util::atomic::write_atomically;
use image::{ImageFormat, Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::Path;

/// Outline thickness in pixels, drawn inside the box edges.
pub const OUTLINE_WIDTH: i64 = 2;
/// Outline color of the selected element.
pub const SELECTED_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
/// Outline color of every other element.
pub const UNSELECTED_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
/// Color of element text.
pub const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Text origins further than this from the canvas cannot reach it and are
/// outside the range glyph positions are exact in.
const MAX_TEXT_OFFSET: f32 = 16_777_216.0;

/// Composite the session onto a copy of its background.
///
/// The session and its background are never modified.
pub fn render(session: &LayoutSession, fonts: &FontResolver) -> Result<RgbaImage> {
    let background = session.background().ok_or(OverlayError::NoBackground)?;
    let mut canvas = background.pixels().clone();

    let needs_font = session.elements().iter().any(TextElement::has_text);
    let font = if needs_font { fonts.resolve_default() } else { None };
    if needs_font && font.is_none() {
        log::warn!("No usable font; text will be skipped");
    }

    for element in session.elements() {
        let color = if element.is_selected() { SELECTED_COLOR } else { UNSELECTED_COLOR };
        draw_outline(&mut canvas, element, color);

        if let (true, Some(font)) = (element.has_text(), font.as_ref()) {
            draw_text(&mut canvas, font, element);
        }
    }

    Ok(canvas)
}

/// Render and write the result as PNG.
pub fn export_png(session: &LayoutSession, fonts: &FontResolver, path: &Path) -> Result<()> {
    let image = render(session, fonts)?;
    write_atomically(path, |file| {
        image.write_to(file, ImageFormat::Png)?;
        Ok(())
    })
    .map_err(|e| OverlayError::export(path, e))?;

    log::info!("Exported PNG {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn draw_hline(canvas: &mut RgbaImage, y: i64, x0: i64, x1: i64, color: Rgba<u8>) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    if y < 0 || y >= h {
        return;
    }
    for x in x0.max(0)..=x1.min(w - 1) {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_vline(canvas: &mut RgbaImage, x: i64, y0: i64, y1: i64, color: Rgba<u8>) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    if x < 0 || x >= w {
        return;
    }
    for y in y0.max(0)..=y1.min(h - 1) {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// Round an edge to a pixel, pinned just outside `[0, limit)`.
///
/// Edges past the canvas draw nothing either way; pinning keeps the inset
/// arithmetic in range for huge or infinite coordinates. NaN maps to 0.
fn pixel_edge(value: f64, limit: u32) -> i64 {
    value.round().clamp(-(OUTLINE_WIDTH as f64), limit as f64 + OUTLINE_WIDTH as f64) as i64
}

/// Outline `[x, x+width] × [y, y+height]`, growing inward, clipped to the canvas.
fn draw_outline(canvas: &mut RgbaImage, element: &TextElement, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    let (left, right) = ordered(pixel_edge(element.x, w), pixel_edge(element.x + element.width, w));
    let (top, bottom) = ordered(pixel_edge(element.y, h), pixel_edge(element.y + element.height, h));

    for inset in 0..OUTLINE_WIDTH {
        let (l, t, r, b) = (left + inset, top + inset, right - inset, bottom - inset);
        if l > r || t > b {
            break;
        }
        draw_hline(canvas, t, l, r, color);
        draw_hline(canvas, b, l, r, color);
        draw_vline(canvas, l, t, b, color);
        draw_vline(canvas, r, t, b, color);
    }
}

fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for i in 0..3 {
        pixel[i] = (color[i] as f32 * coverage + pixel[i] as f32 * (1.0 - coverage)).round() as u8;
    }
    pixel[3] = pixel[3].max((coverage * 255.0).round() as u8);
}

/// Draw the element's text, one line per `\n`, with its top at the inset.
fn draw_text(canvas: &mut RgbaImage, font: &Font<'_>, element: &TextElement) {
    let scale = Scale::uniform(element.font_size as f32);
    let metrics = font.v_metrics(scale);
    let line_advance = metrics.ascent - metrics.descent + metrics.line_gap;

    let origin_x = (element.x + TEXT_INSET) as f32;
    let mut baseline = (element.y + TEXT_INSET) as f32 + metrics.ascent;
    if !(origin_x.abs() <= MAX_TEXT_OFFSET && baseline.abs() <= MAX_TEXT_OFFSET) {
        log::debug!("Text of element {} is far off the canvas; skipped", element.id);
        return;
    }

    for line in element.text.lines() {
        for glyph in font.layout(line, scale, point(origin_x, baseline)) {
            if let Some(bounds) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let x = bounds.min.x as i64 + gx as i64;
                    let y = bounds.min.y as i64 + gy as i64;
                    blend(canvas, x, y, TEXT_COLOR, coverage);
                });
            }
        }
        baseline += line_advance;
    }
}
