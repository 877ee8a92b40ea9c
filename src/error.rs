// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by every core operation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the layout engine.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Background file unreadable, unsupported, or a corrupt PDF.
    #[error("failed to load background {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// A render or export was requested before any background was loaded.
    #[error("no background loaded")]
    NoBackground,

    /// Project file could not be read, parsed, or written.
    #[error("project file {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: SerializationError,
    },

    /// Encoding or writing an exported PNG/PDF failed.
    #[error("failed to export {}: {reason}", path.display())]
    Export { path: PathBuf, reason: String },

    /// Settings file exists but could not be used.
    #[error("invalid settings {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

/// Underlying cause of a [`OverlayError::Serialization`].
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, OverlayError>;

impl OverlayError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn export(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Export {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn serialization(path: impl Into<PathBuf>, source: impl Into<SerializationError>) -> Self {
        Self::Serialization {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_message_includes_cause() {
        let err = OverlayError::serialization(
            "project.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let message = err.to_string();
        assert!(message.contains("project.json"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn test_no_background_message() {
        assert_eq!(OverlayError::NoBackground.to_string(), "no background loaded");
    }
}
