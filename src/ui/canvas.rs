// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the background and its text boxes.
//!
//! The canvas only converts pointer input into background pixel coordinates;
//! selection and movement are decided by the core controller.

use crate::app::Tool;
use textoverlay::render::TEXT_INSET;
use textoverlay::util::geometry::{fit_within, image_to_screen, screen_to_image, DisplayRect};
use textoverlay::{LayoutSession, PointerEvent, TextElement};

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    Pointer(PointerEvent),
    PlaceElement(f64, f64),
}

/// Display the main canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    session: &LayoutSession,
    current_tool: Tool,
    background_texture: &Option<egui::TextureHandle>,
    status: &str,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size() - egui::vec2(0.0, 24.0);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some(background)) = (background_texture, session.background()) else {
            show_welcome(ui);
            return;
        };

        let (img_width, img_height) = (background.width(), background.height());
        let available = ui.available_size();
        let (display_width, display_height) =
            fit_within(img_width, img_height, available.x as f64, available.y as f64);

        // Center the image
        let x_offset = (available.x - display_width as f32) / 2.0;
        let y_offset = (available.y - display_height as f32) / 2.0;
        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width as f32, display_height as f32),
        );
        let display = DisplayRect {
            x: image_rect.min.x as f64,
            y: image_rect.min.y as f64,
            width: image_rect.width() as f64,
            height: image_rect.height() as f64,
        };

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
        let to_image = |pos: egui::Pos2| screen_to_image(pos.x as f64, pos.y as f64, &display, img_width, img_height);

        match current_tool {
            Tool::Select => {
                let (pressed, released, pos) = ui.input(|i| {
                    (
                        i.pointer.primary_pressed(),
                        i.pointer.primary_released(),
                        i.pointer.interact_pos(),
                    )
                });
                if let Some(pos) = pos {
                    let (x, y) = to_image(pos);
                    if pressed && response.hovered() {
                        action = CanvasAction::Pointer(PointerEvent::down(x, y));
                    } else if released {
                        action = CanvasAction::Pointer(PointerEvent::up(x, y));
                    } else if response.dragged() {
                        action = CanvasAction::Pointer(PointerEvent::moved(x, y));
                    }
                }
            }
            Tool::AddText => {
                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let (x, y) = to_image(pos);
                        action = CanvasAction::PlaceElement(x, y);
                    }
                }
            }
        }

        let painter = ui.painter_at(image_rect);
        let scale = display.width / img_width as f64;
        for element in session.elements() {
            draw_element(&painter, element, &display, img_width, img_height, scale);
        }
    });

    // Status line at the bottom
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Current tool: {:?}", current_tool));
        ui.separator();
        match session.background() {
            Some(bg) => ui.label(format!(
                "{} ({}x{}), {} text boxes",
                bg.source_path().display(),
                bg.width(),
                bg.height(),
                session.len()
            )),
            None => ui.label("No background loaded"),
        };
        if !status.is_empty() {
            ui.separator();
            ui.label(status);
        }
    });

    action
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("TEXTOVERLAY")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image or PDF to begin placing text")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Background...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}

/// Preview an element the way the raster export draws it.
fn draw_element(
    painter: &egui::Painter,
    element: &TextElement,
    display: &DisplayRect,
    img_width: u32,
    img_height: u32,
    scale: f64,
) {
    let (x0, y0) = image_to_screen(element.x, element.y, display, img_width, img_height);
    let (x1, y1) = image_to_screen(
        element.x + element.width,
        element.y + element.height,
        display,
        img_width,
        img_height,
    );
    let rect = egui::Rect::from_two_pos(egui::pos2(x0 as f32, y0 as f32), egui::pos2(x1 as f32, y1 as f32));

    let color = if element.is_selected() {
        egui::Color32::RED
    } else {
        egui::Color32::BLUE
    };
    painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, color));

    if element.has_text() {
        let inset = (TEXT_INSET * scale) as f32;
        painter.text(
            egui::pos2(x0 as f32 + inset, y0 as f32 + inset),
            egui::Align2::LEFT_TOP,
            &element.text,
            egui::FontId::proportional((element.font_size as f64 * scale).max(1.0) as f32),
            egui::Color32::BLACK,
        );
    }
}
