// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layout session state.
//!
//! A session is the full in-memory state of one editing instance: the
//! background bitmap, the ordered text elements, and the single selection.
//! It performs no I/O; loading and saving live in [`crate::io`].

use super::element::TextElement;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Immutable background bitmap and the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pixels: RgbaImage,
    source_path: PathBuf,
}

impl BackgroundImage {
    pub fn new(pixels: RgbaImage, source_path: impl Into<PathBuf>) -> Self {
        Self {
            pixels,
            source_path: source_path.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

/// Background + elements + selection.
///
/// Element order is insertion order and paint order. At most one element is
/// flagged as selected; the selected id is always read from that flag.
#[derive(Debug, Clone, Default)]
pub struct LayoutSession {
    background: Option<Arc<BackgroundImage>>,
    elements: Vec<TextElement>,
}

impl LayoutSession {
    /// Create an empty session with no background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from persisted parts.
    ///
    /// The first element flagged as selected wins; any later flags are cleared.
    pub fn from_parts(background: Option<BackgroundImage>, mut elements: Vec<TextElement>) -> Self {
        let mut seen = false;
        for element in &mut elements {
            if element.is_selected() {
                if seen {
                    element.set_selected(false);
                }
                seen = true;
            }
        }

        Self {
            background: background.map(Arc::new),
            elements,
        }
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_deref()
    }

    /// Shared handle to the background, for renders running off the UI thread.
    pub fn background_handle(&self) -> Option<Arc<BackgroundImage>> {
        self.background.clone()
    }

    /// Replace the background. Existing element coordinates are kept as-is.
    pub fn set_background(&mut self, background: BackgroundImage) {
        if !self.elements.is_empty() {
            if let Some(old) = &self.background {
                if (old.width(), old.height()) != (background.width(), background.height()) {
                    log::warn!(
                        "Background size changed from {}x{} to {}x{}; element coordinates are not rescaled",
                        old.width(),
                        old.height(),
                        background.width(),
                        background.height()
                    );
                }
            }
        }
        self.background = Some(Arc::new(background));
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    /// Edit an element in place. Its selection flag stays under session control.
    pub fn element_mut(&mut self, index: usize) -> Option<&mut TextElement> {
        self.elements.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a new element whose id is the element count before insertion.
    ///
    /// Ids are not unique once elements have been removed: a deletion
    /// followed by an insertion can reuse an id still held by another element.
    pub fn add_element(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: impl Into<String>,
        font_size: u32,
    ) -> &TextElement {
        let id = self.elements.len();
        self.elements
            .push(TextElement::new(id, x, y, width, height, text.into(), font_size));
        log::info!("Added element {} at ({:.1}, {:.1}), total: {}", id, x, y, self.elements.len());
        &self.elements[id]
    }

    /// Remove the first element equal to `element`. Does nothing if absent.
    pub fn remove_element(&mut self, element: &TextElement) -> bool {
        let Some(index) = self.elements.iter().position(|e| e == element) else {
            return false;
        };
        self.remove_at(index);
        true
    }

    /// Remove the currently selected element, if any.
    pub fn remove_selected(&mut self) -> Option<TextElement> {
        let index = self.selected_index()?;
        Some(self.remove_at(index))
    }

    fn remove_at(&mut self, index: usize) -> TextElement {
        let removed = self.elements.remove(index);
        log::info!("Removed element {}, total: {}", removed.id, self.elements.len());
        removed
    }

    /// Remove every element and clear the selection.
    pub fn clear_all(&mut self) {
        self.elements.clear();
        log::info!("Cleared all elements");
    }

    /// Select the element at `index`, unselecting all others.
    pub fn set_selected(&mut self, index: usize) -> bool {
        if index >= self.elements.len() {
            return false;
        }
        for (i, element) in self.elements.iter_mut().enumerate() {
            element.set_selected(i == index);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        for element in &mut self.elements {
            element.set_selected(false);
        }
    }

    pub fn selected_id(&self) -> Option<usize> {
        self.selected_element().map(|e| e.id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.elements.iter().position(TextElement::is_selected)
    }

    pub fn selected_element(&self) -> Option<&TextElement> {
        self.elements.iter().find(|e| e.is_selected())
    }

    pub fn selected_element_mut(&mut self) -> Option<&mut TextElement> {
        self.elements.iter_mut().find(|e| e.is_selected())
    }
}
