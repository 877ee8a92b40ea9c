// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text element data structures.
//!
//! A text element is a positioned, sized text box expressed in background
//! pixel coordinates (origin top-left, Y down).

use serde::{Deserialize, Serialize};

/// A positioned text box.
///
/// Coordinates are never clamped: elements may sit partly or fully outside
/// the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub font_size: u32,
    /// Only the owning session changes this, so at most one element is flagged.
    selected: bool,
}

impl TextElement {
    /// Create an unselected element.
    pub fn new(id: usize, x: f64, y: f64, width: f64, height: f64, text: String, font_size: u32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            text,
            font_size,
            selected: false,
        }
    }

    /// Check whether a point lies inside the box, edges included.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Shift the element by a delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
