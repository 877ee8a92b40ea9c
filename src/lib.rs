// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! TEXTOVERLAY - positioned text fields over an image or PDF page.
//!
//! The library holds the layout engine: the session model, hit-testing and
//! drag semantics, the raster compositor, the PDF projector, and project
//! persistence. The desktop host in `main.rs` is only a consumer of this API.

pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod models;
pub mod render;
pub mod util;

pub use config::Settings;
pub use controller::{DragController, PointerEvent, PointerPhase};
pub use error::{OverlayError, Result, SerializationError};
pub use models::element::TextElement;
pub use models::session::{BackgroundImage, LayoutSession};
