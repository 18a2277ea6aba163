//! New-tab configuration (`newtab.json`).
//!
//! Missing or unreadable files fall back to defaults; the reason is logged.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::search_engine::{SearchEngine, SearchSettings};

/// Smallest aspect ratio that still leaves room for the tile label.
pub const MIN_IMAGE_ASPECT_RATIO: f32 = 0.2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewTabConfig {
    /// Directory holding `favorites.json` and the legacy bookmarks file.
    pub data_dir: PathBuf,
    /// Engine the private-search callout promotes.
    pub promoted_engine: SearchEngine,
    /// Thumbnail width / height.
    pub image_aspect_ratio: f32,
    /// Edge length thumbnails are downscaled to, in pixels.
    pub thumbnail_size: u32,
    /// Space above and below the callout.
    pub callout_padding: f32,
    pub search: SearchSettings,
}

impl Default for NewTabConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".alice-newtab"),
            promoted_engine: SearchEngine::DuckDuckGo,
            image_aspect_ratio: 1.0,
            thumbnail_size: 96,
            callout_padding: 16.0,
            search: SearchSettings::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NewTabConfig {
    pub fn favorites_path(&self) -> PathBuf {
        self.data_dir.join("favorites.json")
    }

    pub fn legacy_bookmarks_path(&self) -> PathBuf {
        self.data_dir.join("legacy_bookmarks.json")
    }

    /// Strict load: any failure is returned.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Lenient load used at startup.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.image_aspect_ratio.is_finite() || self.image_aspect_ratio < MIN_IMAGE_ASPECT_RATIO {
            log::warn!(
                "image_aspect_ratio {} too small, using {}",
                self.image_aspect_ratio,
                defaults.image_aspect_ratio
            );
            self.image_aspect_ratio = defaults.image_aspect_ratio;
        }
        if self.thumbnail_size == 0 {
            self.thumbnail_size = defaults.thumbnail_size;
        }
        if !self.callout_padding.is_finite() || self.callout_padding < 0.0 {
            self.callout_padding = defaults.callout_padding;
        }
        self
    }
}
