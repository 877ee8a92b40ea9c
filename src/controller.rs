// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hit-testing and drag handling.
//!
//! Translates pointer positions (already in background pixel space) into
//! selection and move operations on a [`LayoutSession`].

use crate::models::session::LayoutSession;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A pointer event in background pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self { phase: PointerPhase::Down, x, y }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self { phase: PointerPhase::Move, x, y }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self { phase: PointerPhase::Up, x, y }
    }
}

/// Index of the first element, in insertion order, whose box contains the point.
///
/// Earlier elements win over later ones even though later ones paint on top.
pub fn hit_test(session: &LayoutSession, px: f64, py: f64) -> Option<usize> {
    session.elements().iter().position(|e| e.contains(px, py))
}

/// In-progress drag of a single element.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    index: usize,
    anchor_x: f64,
    anchor_y: f64,
}

/// Tracks the drag anchor between pointer events.
#[derive(Debug, Default)]
pub struct DragController {
    drag: Option<DragState>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Index of the element being dragged, if any.
    pub fn dragged_index(&self) -> Option<usize> {
        self.drag.map(|d| d.index)
    }

    /// Record the anchor for dragging the element at `index`. Does not move it.
    pub fn begin_drag(&mut self, index: usize, pointer_x: f64, pointer_y: f64) {
        self.drag = Some(DragState {
            index,
            anchor_x: pointer_x,
            anchor_y: pointer_y,
        });
        log::debug!("Begin drag of element at index {} from ({:.1}, {:.1})", index, pointer_x, pointer_y);
    }

    /// Move the dragged element by the delta since the last anchor, then
    /// re-anchor at the new pointer position.
    pub fn update_drag(&mut self, session: &mut LayoutSession, pointer_x: f64, pointer_y: f64) {
        let Some(state) = self.drag.as_mut() else {
            return;
        };
        let dx = pointer_x - state.anchor_x;
        let dy = pointer_y - state.anchor_y;
        if let Some(element) = session.element_mut(state.index) {
            element.translate(dx, dy);
        }
        state.anchor_x = pointer_x;
        state.anchor_y = pointer_y;
    }

    /// Drop the anchor. No snapping or clamping is applied.
    pub fn end_drag(&mut self) {
        if let Some(state) = self.drag.take() {
            log::debug!("End drag of element at index {}", state.index);
        }
    }

    /// Apply one pointer event to the session.
    ///
    /// Down selects the hit element and starts dragging it, or clears the
    /// selection when nothing is hit. Returns the index of the element under
    /// interaction.
    pub fn handle_pointer(&mut self, session: &mut LayoutSession, event: PointerEvent) -> Option<usize> {
        match event.phase {
            PointerPhase::Down => match hit_test(session, event.x, event.y) {
                Some(index) => {
                    session.set_selected(index);
                    self.begin_drag(index, event.x, event.y);
                    log::info!("Selected element at index {}", index);
                    Some(index)
                }
                None => {
                    session.clear_selection();
                    self.end_drag();
                    None
                }
            },
            PointerPhase::Move => {
                self.update_drag(session, event.x, event.y);
                self.dragged_index()
            }
            PointerPhase::Up => {
                let index = self.dragged_index();
                self.end_drag();
                index
            }
        }
    }
}
