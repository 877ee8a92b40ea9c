// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project document for serialization.
//!
//! The field names are the on-disk project format and must not change.

use super::element::TextElement;
use super::session::LayoutSession;
use serde::{Deserialize, Serialize};

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub background_path: Option<String>,
    pub text_boxes: Vec<TextElement>,
}

impl ProjectFile {
    /// Snapshot a session. Only the background path is stored, never pixels.
    pub fn from_session(session: &LayoutSession) -> Self {
        Self {
            background_path: session
                .background()
                .map(|bg| bg.source_path().to_string_lossy().into_owned()),
            text_boxes: session.elements().to_vec(),
        }
    }
}
