// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project serialization and deserialization.
//!
//! Projects are JSON. A `.yaml` or `.yml` path switches to YAML with the same
//! field names. Only the background path is stored, never its pixels.

use crate::config::Settings;
use crate::error::{OverlayError, Result};
use crate::io::media::{self, PageRasterizer};
use crate::models::{element::TextElement, project::ProjectFile, session::LayoutSession};
use crate::util::atomic::write_atomically;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_for(path: &Path) -> Format {
    let extension = path.extension().and_then(|s| s.to_str());
    match extension.map(str::to_ascii_lowercase).as_deref() {
        Some("yaml") | Some("yml") => Format::Yaml,
        _ => Format::Json,
    }
}

/// Result of reading a project file, before the background is reloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
    pub background_path: Option<PathBuf>,
    pub elements: Vec<TextElement>,
}

/// Write the session's background path and elements to `path`.
///
/// The file is replaced atomically; a failed save leaves any existing file intact.
pub fn save_project(session: &LayoutSession, path: &Path) -> Result<()> {
    let project = ProjectFile::from_session(session);

    let encoded = match format_for(path) {
        Format::Json => serde_json::to_string_pretty(&project)
            .map_err(|e| OverlayError::serialization(path, e))?,
        Format::Yaml => serde_yaml::to_string(&project)
            .map_err(|e| OverlayError::serialization(path, e))?,
    };

    write_atomically(path, |file| {
        file.write_all(encoded.as_bytes())?;
        Ok(())
    })
    .map_err(|e| {
        let io = match e.downcast::<std::io::Error>() {
            Ok(io) => io,
            Err(other) => std::io::Error::other(other.to_string()),
        };
        OverlayError::serialization(path, io)
    })?;

    log::info!("Saved project with {} elements to {}", project.text_boxes.len(), path.display());
    Ok(())
}

/// Read a project file without touching the background.
pub fn load_project(path: &Path) -> Result<LoadedProject> {
    let contents = std::fs::read_to_string(path).map_err(|e| OverlayError::serialization(path, e))?;

    let project: ProjectFile = match format_for(path) {
        Format::Json => serde_json::from_str(&contents).map_err(|e| OverlayError::serialization(path, e))?,
        Format::Yaml => serde_yaml::from_str(&contents).map_err(|e| OverlayError::serialization(path, e))?,
    };

    log::info!("Read {} elements from {}", project.text_boxes.len(), path.display());
    Ok(LoadedProject {
        background_path: project.background_path.map(PathBuf::from),
        elements: project.text_boxes,
    })
}

/// Locate a stored background path: as written, then relative to the project file.
fn locate_background(stored: &Path, project_path: &Path) -> Option<PathBuf> {
    if stored.exists() {
        return Some(stored.to_path_buf());
    }
    if stored.is_relative() {
        let beside = project_path.parent()?.join(stored);
        if beside.exists() {
            return Some(beside);
        }
    }
    None
}

/// Load a project into a fresh session, reloading its background when possible.
///
/// A stale background path, or a background that no longer decodes, yields a
/// session without background; only the project file itself can fail the load.
pub fn open_project(path: &Path, settings: &Settings, rasterizer: &dyn PageRasterizer) -> Result<LayoutSession> {
    let loaded = load_project(path)?;

    let background = match loaded.background_path {
        Some(stored) => match locate_background(&stored, path) {
            Some(found) => match media::load_background(&found, settings, rasterizer) {
                Ok(background) => Some(background),
                Err(e) => {
                    log::warn!("{}; continuing without background", e);
                    None
                }
            },
            None => {
                log::warn!("Background {} not found; continuing without background", stored.display());
                None
            }
        },
        None => None,
    };

    Ok(LayoutSession::from_parts(background, loaded.elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SerializationError;
    use crate::io::media::UnavailableRasterizer;

    fn sample_session() -> LayoutSession {
        let mut session = LayoutSession::new();
        session.add_element(300.0, 250.0, 200.0, 50.0, "ชื่อ", 20);
        session.add_element(-15.5, 900.0, 0.0, -3.0, "", 9);
        session.set_selected(1);
        session
    }

    #[test]
    fn test_json_roundtrip_without_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        let session = sample_session();

        save_project(&session, &path).unwrap();
        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.background_path, None);
        assert_eq!(loaded.elements, session.elements());
    }

    #[test]
    fn test_json_uses_project_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        save_project(&sample_session(), &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.get("background_path").unwrap().is_null());
        assert_eq!(value["text_boxes"][0]["font_size"], 20);
        assert_eq!(value["text_boxes"][1]["selected"], true);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.yml");
        let session = sample_session();

        save_project(&session, &path).unwrap();
        assert_eq!(load_project(&path).unwrap().elements, session.elements());
    }

    #[test]
    fn test_fractional_coordinates_roundtrip_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        let mut session = LayoutSession::new();
        for k in 0..2000 {
            let x = k as f64 / 7.0 * 0.123456789;
            let y = (k as f64 * 1.1).sqrt() / 3.0 - 17.25;
            session.add_element(x, y, x / 3.0 + 0.1, y.abs() / 9.0, "", 12);
        }

        save_project(&session, &path).unwrap();
        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.elements, session.elements());
    }

    #[test]
    fn test_other_extensions_are_json() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("myform.proj");
        std::fs::write(&custom, r#"{"background_path": null, "text_boxes": []}"#).unwrap();
        let loaded = load_project(&custom).unwrap();
        assert!(loaded.elements.is_empty());

        let bare = dir.path().join("layout");
        let session = sample_session();
        save_project(&session, &bare).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&bare).unwrap()).unwrap();
        assert_eq!(value["text_boxes"][0]["font_size"], 20);
        assert_eq!(load_project(&bare).unwrap().elements, session.elements());
    }

    #[test]
    fn test_uppercase_yaml_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PROJECT.YAML");
        save_project(&sample_session(), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("text_boxes:"));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, "{\"background_path\": null, \"text_boxes\": [").unwrap();
        let err = load_project(&path).unwrap_err();
        assert!(matches!(err, OverlayError::Serialization { source: SerializationError::Json(_), .. }));
    }

    #[test]
    fn test_unreadable_file_is_serialization_error() {
        let err = load_project(Path::new("/nonexistent/project.json")).unwrap_err();
        assert!(matches!(err, OverlayError::Serialization { source: SerializationError::Io(_), .. }));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("gone");
        let path = missing_dir.join("project.json");
        let err = save_project(&sample_session(), &path).unwrap_err();
        assert!(matches!(err, OverlayError::Serialization { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_with_stale_background_keeps_elements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(
            &path,
            r#"{"background_path": "/no/such/form.png", "text_boxes": [
                {"id": 0, "x": 1, "y": 2, "width": 3, "height": 4, "text": "a", "font_size": 10, "selected": true}
            ]}"#,
        )
        .unwrap();

        let session = open_project(&path, &Settings::default(), &UnavailableRasterizer).unwrap();
        assert!(session.background().is_none());
        assert_eq!(session.len(), 1);
        assert_eq!(session.selected_id(), Some(0));
    }

    #[test]
    fn test_open_resolves_background_beside_project() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::new(12, 8).save(dir.path().join("form.png")).unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, r#"{"background_path": "form.png", "text_boxes": []}"#).unwrap();

        let session = open_project(&path, &Settings::default(), &UnavailableRasterizer).unwrap();
        assert_eq!(session.background().map(|b| (b.width(), b.height())), Some((12, 8)));
    }
}
