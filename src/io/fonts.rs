// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Font resolution for raster export.
//!
//! Fonts are looked up by name through a prioritized list of candidate files
//! and search directories. When nothing matches, the proportional font
//! bundled with egui is used, so resolution always yields a drawable font.

use crate::config::FontSettings;
use once_cell::sync::{Lazy, OnceCell};
use rusttype::Font;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bundled egui fonts tried, in order, as the last resort.
const BUILTIN_FONT_NAMES: &[&str] = &["Ubuntu-Light", "Hack"];

static BUILTIN_FONT: Lazy<Option<Font<'static>>> = Lazy::new(|| {
    let definitions = egui::FontDefinitions::default();
    BUILTIN_FONT_NAMES
        .iter()
        .filter_map(|name| definitions.font_data.get(*name))
        .find_map(|data| Font::try_from_vec_and_index(data.font.to_vec(), data.index))
});

/// The font bundled with the application.
///
/// `None` only if the bundled font data fails to parse.
pub fn builtin_font() -> Option<Font<'static>> {
    BUILTIN_FONT.clone()
}

/// Resolves font names to loaded fonts.
///
/// The default font is resolved once and shared by clones, so repeated
/// exports neither reread font files nor repeat the fallback warning.
#[derive(Clone, Default)]
pub struct FontResolver {
    search_dirs: Vec<PathBuf>,
    candidates: Vec<String>,
    default_font: Arc<OnceCell<Option<Font<'static>>>>,
}

impl fmt::Debug for FontResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontResolver")
            .field("search_dirs", &self.search_dirs)
            .field("candidates", &self.candidates)
            .field("default_resolved", &self.default_font.get().is_some())
            .finish()
    }
}

impl FontResolver {
    pub fn new(settings: &FontSettings) -> Self {
        Self {
            search_dirs: settings.search_dirs.clone(),
            candidates: settings.candidates.clone(),
            default_font: Arc::default(),
        }
    }

    /// Resolve `name` (a path or a file name in a search directory), then the
    /// configured candidates, then the built-in font.
    pub fn resolve(&self, name: Option<&str>) -> Option<Font<'static>> {
        if let Some(font) = name.and_then(|name| self.load_named(name)) {
            return Some(font);
        }
        self.resolve_default()
    }

    /// Resolve using only the configured candidates.
    pub fn resolve_default(&self) -> Option<Font<'static>> {
        self.default_font
            .get_or_init(|| {
                let configured = self.candidates.iter().find_map(|name| self.load_named(name));
                if configured.is_some() {
                    return configured;
                }
                log::warn!("No configured font found, using built-in font");
                builtin_font()
            })
            .clone()
    }

    fn load_named(&self, name: &str) -> Option<Font<'static>> {
        let direct = Path::new(name);
        if direct.is_absolute() || direct.components().count() > 1 {
            return load_font_file(direct);
        }
        self.search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find_map(|path| load_font_file(&path))
    }
}

fn load_font_file(path: &Path) -> Option<Font<'static>> {
    let data = std::fs::read(path).ok()?;
    match Font::try_from_vec(data) {
        Some(font) => {
            log::debug!("Loaded font {}", path.display());
            Some(font)
        }
        None => {
            log::warn!("Skipping unparseable font {}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_font_available() {
        let font = builtin_font().expect("bundled font parses");
        let glyph = font.glyph('A');
        assert_ne!(glyph.id().0, 0);
    }

    #[test]
    fn test_falls_back_when_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FontResolver::new(&FontSettings {
            search_dirs: vec![dir.path().to_path_buf()],
            candidates: vec!["missing.ttf".to_string()],
        });
        assert!(resolver.resolve(Some("also-missing.ttf")).is_some());
    }

    #[test]
    fn test_skips_corrupt_candidate() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.ttf"), b"garbage").unwrap();
        let resolver = FontResolver::new(&FontSettings {
            search_dirs: vec![dir.path().to_path_buf()],
            candidates: vec!["bad.ttf".to_string()],
        });
        assert!(resolver.load_named("bad.ttf").is_none());
        assert!(resolver.resolve_default().is_some());
    }

    #[test]
    fn test_default_font_resolved_once() {
        let dir = tempfile::tempdir().unwrap();
        let bundled = egui::FontDefinitions::default();
        let data = bundled.font_data.get(BUILTIN_FONT_NAMES[0]).unwrap();
        let font_path = dir.path().join("custom.ttf");
        std::fs::write(&font_path, data.font.as_ref()).unwrap();

        let resolver = FontResolver::new(&FontSettings {
            search_dirs: vec![dir.path().to_path_buf()],
            candidates: vec!["custom.ttf".to_string()],
        });
        let shared = resolver.clone();
        assert!(resolver.resolve_default().is_some());

        // Later renders reuse the cached font, even from clones.
        std::fs::remove_file(&font_path).unwrap();
        assert!(shared.default_font.get().is_some());
        assert!(shared.resolve_default().is_some());
        assert!(resolver.load_named("custom.ttf").is_none());
    }
}
