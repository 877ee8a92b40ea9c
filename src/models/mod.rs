// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: text elements, the layout session, and the project document.

pub mod element;
pub mod project;
pub mod session;
