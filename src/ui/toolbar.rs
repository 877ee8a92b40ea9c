// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.

use crate::app::Tool;

/// Display the toolbar with tool selection buttons.
pub fn show(ui: &mut egui::Ui, current_tool: &mut Tool) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        if ui.selectable_label(*current_tool == Tool::Select, "⬆ Select").clicked() {
            *current_tool = Tool::Select;
        }

        if ui.selectable_label(*current_tool == Tool::AddText, "T Add Text").clicked() {
            *current_tool = Tool::AddText;
        }

        ui.separator();

        let tool_text = match current_tool {
            Tool::Select => "Click a text box to select it, drag to move it",
            Tool::AddText => "Click on the background to place a new text box",
        };

        ui.label(egui::RichText::new(tool_text).italics().weak());
    });
}
