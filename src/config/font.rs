//! Caption font configuration.
//!
//! The caption face is loaded from `path` when set, otherwise from the first
//! readable entry in `fallback_paths`. When neither yields a face, captions
//! are measured with an average-advance estimate and glyphs are not drawn.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Common bold sans-serif faces shipped with desktop and server systems
fn default_fallback_paths() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Preferred caption face (TTF/OTF)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Faces tried in order when `path` is unset or unreadable
    #[serde(default = "default_fallback_paths")]
    pub fallback_paths: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            fallback_paths: default_fallback_paths(),
        }
    }
}

impl FontConfig {
    /// Config with only an explicit face and no fallbacks.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            fallback_paths: Vec::new(),
        }
    }

    /// Config that never finds a face.
    pub fn none() -> Self {
        Self {
            path: None,
            fallback_paths: Vec::new(),
        }
    }

    /// Candidate paths in load order, paired with whether each is the primary face.
    pub fn candidates(&self) -> impl Iterator<Item = (&PathBuf, bool)> + '_ {
        self.path
            .iter()
            .map(|p| (p, true))
            .chain(self.fallback_paths.iter().map(|p| (p, false)))
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err("font.path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}
