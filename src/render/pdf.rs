// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! PDF projector.
//!
//! Re-projects the session from background pixels (origin top-left, Y down)
//! onto a fixed-size page in points (origin bottom-left, Y up). The background
//! is stretched over the whole page and text is set in the standard Helvetica
//! font, independent of the font used for raster export.

use super::TEXT_INSET;
use crate::config::PageSize;
use crate::error::{OverlayError, Result};
use crate::models::session::{BackgroundImage, LayoutSession};
use crate::util::atomic::write_atomically;
use crate::util::geometry::pixel_to_pdf;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

/// Line advance for multi-line text, as a multiple of the font size.
const LINE_SPACING: f64 = 1.2;
const JPEG_QUALITY: u8 = 90;
const FONT_RESOURCE: &str = "F1";
const IMAGE_RESOURCE: &str = "Im0";

/// Where the background image is drawn on the page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One line of text with its baseline origin in page points.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub element_id: usize,
    pub x: f64,
    pub y: f64,
    pub font_size: u32,
    pub text: String,
}

/// Everything needed to draw one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPageDescriptor {
    pub page_width: f64,
    pub page_height: f64,
    pub background: ImagePlacement,
    pub runs: Vec<TextRun>,
}

/// Project the session onto a `page_width × page_height` page.
///
/// Each element with text is anchored at its projected top-left corner, then
/// offset right by the inset and down by the font size plus the inset so
/// the baseline falls inside the box.
pub fn render_to_pdf_page(session: &LayoutSession, page_width: f64, page_height: f64) -> Result<PdfPageDescriptor> {
    let background = session.background().ok_or(OverlayError::NoBackground)?;

    let mut runs = Vec::new();
    for element in session.elements().iter().filter(|e| e.has_text()) {
        let (pdf_x, pdf_y) = pixel_to_pdf(
            element.x,
            element.y,
            background.width(),
            background.height(),
            page_width,
            page_height,
        );
        let x = pdf_x + TEXT_INSET;
        let first_baseline = pdf_y - element.font_size as f64 - TEXT_INSET;

        for (i, line) in element.text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            runs.push(TextRun {
                element_id: element.id,
                x,
                y: first_baseline - i as f64 * element.font_size as f64 * LINE_SPACING,
                font_size: element.font_size,
                text: line.to_string(),
            });
        }
    }

    Ok(PdfPageDescriptor {
        page_width,
        page_height,
        background: ImagePlacement {
            x: 0.0,
            y: 0.0,
            width: page_width,
            height: page_height,
        },
        runs,
    })
}

/// Encode text for the standard font; characters outside Latin-1 become `?`.
fn encode_standard_font(text: &str) -> Vec<u8> {
    let mut replaced = 0usize;
    let bytes = text
        .chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(byte) => byte,
            Err(_) => {
                replaced += 1;
                b'?'
            }
        })
        .collect();
    if replaced > 0 {
        log::warn!(
            "{} character(s) in {:?} are not available in the standard PDF font",
            replaced,
            text
        );
    }
    bytes
}

/// Flatten transparency onto white; JPEG has no alpha channel.
fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as u32;
        let mix = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([mix(r), mix(g), mix(b)])
    })
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Build a single-page document from a descriptor and its background.
pub fn build_document(page: &PdfPageDescriptor, background: &BackgroundImage) -> anyhow::Result<Document> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&flatten_on_white(background.pixels()))?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => background.width() as i64,
            "Height" => background.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { FONT_RESOURCE => font_id },
        "XObject" => dictionary! { IMAGE_RESOURCE => image_id },
    });

    let placement = page.background;
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                real(placement.width),
                real(0.0),
                real(0.0),
                real(placement.height),
                real(placement.x),
                real(placement.y),
            ],
        ),
        Operation::new("Do", vec![IMAGE_RESOURCE.into()]),
        Operation::new("Q", vec![]),
        Operation::new("g", vec![real(0.0)]),
    ];
    for run in &page.runs {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![FONT_RESOURCE.into(), Object::Integer(run.font_size as i64)]));
        operations.push(Operation::new("Td", vec![real(run.x), real(run.y)]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(encode_standard_font(&run.text))]));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(page.page_width), real(page.page_height)],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Project, build, and write a single-page PDF.
pub fn export_pdf(session: &LayoutSession, page: PageSize, path: &Path) -> Result<()> {
    let descriptor = render_to_pdf_page(session, page.width, page.height)?;
    let background = session.background().ok_or(OverlayError::NoBackground)?;

    let mut doc = build_document(&descriptor, background).map_err(|e| OverlayError::export(path, e))?;
    write_atomically(path, |file| {
        doc.save_to(file)?;
        Ok(())
    })
    .map_err(|e| OverlayError::export(path, e))?;

    log::info!(
        "Exported PDF {} ({} text runs, {}x{} pt)",
        path.display(),
        descriptor.runs.len(),
        page.width,
        page.height
    );
    Ok(())
}
