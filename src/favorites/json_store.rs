//! File-backed favorites store.
//!
//! The file is the source of truth: every read reloads it and every
//! mutation is a read-modify-write. Writes go to a `.tmp` sibling first and
//! are renamed over the original so a crash never leaves a half-written file.

use std::fs;
use std::path::{Path, PathBuf};

use super::{reorder_entries, remove_entry, update_entry, FavoriteEntry, FavoritesStore, StoreError};

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/favorites.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join("favorites.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &[FavoriteEntry]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;
        log::debug!("Saved {} favorites to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn modify<F>(&mut self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Vec<FavoriteEntry>) -> Result<(), StoreError>,
    {
        let mut entries = self.load()?;
        f(&mut entries)?;
        self.save(&entries)
    }
}

impl FavoritesStore for JsonFileStore {
    fn fetch_all(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        self.load()
    }

    fn add(&mut self, entry: FavoriteEntry) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.push(entry);
            Ok(())
        })
    }

    fn remove(&mut self, entry: &FavoriteEntry) -> Result<(), StoreError> {
        self.modify(|entries| remove_entry(entries, entry))
    }

    fn update(&mut self, entry: &FavoriteEntry, title: &str, url: &str) -> Result<(), StoreError> {
        self.modify(|entries| update_entry(entries, entry, title, url))
    }

    fn reorder(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        self.modify(|entries| reorder_entries(entries, from, to))
    }
}
