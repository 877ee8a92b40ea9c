// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for backgrounds, fonts, and project files.

pub mod fonts;
pub mod media;
pub mod serialization;
