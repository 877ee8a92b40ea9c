// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text box properties panel.
//!
//! Holds the values used for new text boxes, edits the selected box, and
//! lists every box in paint order. Numeric widgets only produce valid values,
//! so the core never has to revalidate them.

use textoverlay::config::ElementDefaults;
use textoverlay::LayoutSession;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    SelectElement(usize),
    DeleteSelected,
}

/// Display the properties panel.
pub fn show(ui: &mut egui::Ui, draft: &mut ElementDefaults, session: &mut LayoutSession) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("New Text Box");
    egui::Grid::new("draft_grid").num_columns(2).show(ui, |ui| {
        ui.label("Width");
        ui.add(egui::DragValue::new(&mut draft.width).range(0.0..=10_000.0));
        ui.end_row();

        ui.label("Height");
        ui.add(egui::DragValue::new(&mut draft.height).range(0.0..=10_000.0));
        ui.end_row();

        ui.label("Font size");
        ui.add(egui::DragValue::new(&mut draft.font_size).range(1..=500));
        ui.end_row();

        ui.label("Text");
        ui.text_edit_singleline(&mut draft.text);
        ui.end_row();
    });

    ui.separator();
    ui.heading("Selected");

    match session.selected_element_mut() {
        Some(element) => {
            ui.label(format!("Text box #{}", element.id));
            egui::Grid::new("selected_grid").num_columns(2).show(ui, |ui| {
                ui.label("X");
                ui.add(egui::DragValue::new(&mut element.x));
                ui.end_row();

                ui.label("Y");
                ui.add(egui::DragValue::new(&mut element.y));
                ui.end_row();

                ui.label("Width");
                ui.add(egui::DragValue::new(&mut element.width).range(0.0..=10_000.0));
                ui.end_row();

                ui.label("Height");
                ui.add(egui::DragValue::new(&mut element.height).range(0.0..=10_000.0));
                ui.end_row();

                ui.label("Font size");
                ui.add(egui::DragValue::new(&mut element.font_size).range(1..=500));
                ui.end_row();
            });
            ui.label("Text");
            ui.text_edit_multiline(&mut element.text);
            if ui.button("🗑 Delete").clicked() {
                action = PropertiesAction::DeleteSelected;
            }
        }
        None => {
            ui.label(egui::RichText::new("Nothing selected").weak());
        }
    }

    ui.separator();
    ui.heading(format!("Text Boxes ({})", session.len()));

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, element) in session.elements().iter().enumerate() {
            let label = if element.text.is_empty() {
                format!("#{} (empty)", element.id)
            } else {
                format!("#{} {}", element.id, element.text.lines().next().unwrap_or_default())
            };
            if ui.selectable_label(element.is_selected(), label).clicked() {
                action = PropertiesAction::SelectElement(index);
            }
        }
    });

    action
}
