// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Output pipelines.
//!
//! Both pipelines read the same session. The raster compositor works in
//! background pixels; the PDF projector re-projects those pixels onto a fixed
//! page in points with a bottom-left origin.

pub mod pdf;
pub mod raster;

/// Distance between an element's top-left corner and its text, in output units.
pub const TEXT_INSET: f64 = 5.0;
