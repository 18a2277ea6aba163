//! Favorite-site storage.
//!
//! The new-tab grid never owns favorites: it reads and mutates them through
//! the [`FavoritesStore`] trait. Two stores ship with the crate:
//!
//! - [`MemoryStore`] — a plain `Vec`, used by tests and demos
//! - [`JsonFileStore`] — a JSON file on disk, rewritten atomically
//!
//! Legacy bookmark import lives in [`migrate`].

pub mod json_store;
pub mod migrate;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

pub use json_store::JsonFileStore;

/// One favorite tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
}

impl FavoriteEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: url.into(),
        }
    }

    pub fn untitled(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: url.into(),
        }
    }

    /// Label shown under the tile: the title when set, otherwise the host.
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => url::Url::parse(&self.url)
                .ok()
                .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
                .unwrap_or_else(|| self.url.clone()),
        }
    }
}

/// Errors raised by favorite stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed favorites file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("index {index} out of range for {len} favorites")]
    OutOfRange { index: usize, len: usize },
    #[error("favorite not found: {0}")]
    NotFound(String),
}

/// Ordered favorites persistence.
///
/// `reorder(from, to)` removes the entry at `from` and reinserts it at `to`,
/// so `[A, B, C]` with `reorder(0, 2)` becomes `[B, C, A]`.
pub trait FavoritesStore {
    fn fetch_all(&self) -> Result<Vec<FavoriteEntry>, StoreError>;
    fn add(&mut self, entry: FavoriteEntry) -> Result<(), StoreError>;
    fn remove(&mut self, entry: &FavoriteEntry) -> Result<(), StoreError>;
    fn update(&mut self, entry: &FavoriteEntry, title: &str, url: &str) -> Result<(), StoreError>;
    fn reorder(&mut self, from: usize, to: usize) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<FavoriteEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<FavoriteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }
}

impl FavoritesStore for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        Ok(self.entries.clone())
    }

    fn add(&mut self, entry: FavoriteEntry) -> Result<(), StoreError> {
        self.entries.push(entry);
        Ok(())
    }

    fn remove(&mut self, entry: &FavoriteEntry) -> Result<(), StoreError> {
        remove_entry(&mut self.entries, entry)
    }

    fn update(&mut self, entry: &FavoriteEntry, title: &str, url: &str) -> Result<(), StoreError> {
        update_entry(&mut self.entries, entry, title, url)
    }

    fn reorder(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        reorder_entries(&mut self.entries, from, to)
    }
}

/// Shared handle, so a migration job and the screen can use the same store.
impl<S: FavoritesStore> FavoritesStore for Arc<Mutex<S>> {
    fn fetch_all(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        self.lock().unwrap_or_else(|p| p.into_inner()).fetch_all()
    }

    fn add(&mut self, entry: FavoriteEntry) -> Result<(), StoreError> {
        self.lock().unwrap_or_else(|p| p.into_inner()).add(entry)
    }

    fn remove(&mut self, entry: &FavoriteEntry) -> Result<(), StoreError> {
        self.lock().unwrap_or_else(|p| p.into_inner()).remove(entry)
    }

    fn update(&mut self, entry: &FavoriteEntry, title: &str, url: &str) -> Result<(), StoreError> {
        self.lock()
            .unwrap_or_else(|p| p.into_inner())
            .update(entry, title, url)
    }

    fn reorder(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        self.lock().unwrap_or_else(|p| p.into_inner()).reorder(from, to)
    }
}

// ─── Shared list operations ──────────────────────────────────────────────────

pub(crate) fn remove_entry(
    entries: &mut Vec<FavoriteEntry>,
    entry: &FavoriteEntry,
) -> Result<(), StoreError> {
    let idx = entries
        .iter()
        .position(|e| e == entry)
        .ok_or_else(|| StoreError::NotFound(entry.url.clone()))?;
    entries.remove(idx);
    Ok(())
}

pub(crate) fn update_entry(
    entries: &mut [FavoriteEntry],
    entry: &FavoriteEntry,
    title: &str,
    url: &str,
) -> Result<(), StoreError> {
    let target = entries
        .iter_mut()
        .find(|e| **e == *entry)
        .ok_or_else(|| StoreError::NotFound(entry.url.clone()))?;
    target.title = Some(title.to_string());
    target.url = url.to_string();
    Ok(())
}

pub(crate) fn reorder_entries(
    entries: &mut Vec<FavoriteEntry>,
    from: usize,
    to: usize,
) -> Result<(), StoreError> {
    let len = entries.len();
    if from >= len {
        return Err(StoreError::OutOfRange { index: from, len });
    }
    if to >= len {
        return Err(StoreError::OutOfRange { index: to, len });
    }
    let moved = entries.remove(from);
    entries.insert(to, moved);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> MemoryStore {
        MemoryStore::with_entries(vec![
            FavoriteEntry::new("A", "https://a.test"),
            FavoriteEntry::new("B", "https://b.test"),
            FavoriteEntry::new("C", "https://c.test"),
        ])
    }

    fn titles(store: &MemoryStore) -> Vec<String> {
        store.entries().iter().map(|e| e.display_title()).collect()
    }

    #[test]
    fn reorder_first_to_last() {
        let mut store = abc();
        store.reorder(0, 2).unwrap();
        assert_eq!(titles(&store), ["B", "C", "A"]);
    }

    #[test]
    fn reorder_last_to_first() {
        let mut store = abc();
        store.reorder(2, 0).unwrap();
        assert_eq!(titles(&store), ["C", "A", "B"]);
    }

    #[test]
    fn reorder_out_of_range() {
        let mut store = abc();
        assert!(matches!(
            store.reorder(0, 3),
            Err(StoreError::OutOfRange { index: 3, len: 3 })
        ));
        assert_eq!(titles(&store), ["A", "B", "C"]);
    }

    #[test]
    fn remove_and_update() {
        let mut store = abc();
        let b = store.entries()[1].clone();
        store.update(&b, "Bee", "https://bee.test").unwrap();
        assert_eq!(store.entries()[1].url, "https://bee.test");

        let a = store.entries()[0].clone();
        store.remove(&a).unwrap();
        assert_eq!(titles(&store), ["Bee", "C"]);
        assert!(matches!(store.remove(&a), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn display_title_falls_back_to_host() {
        let e = FavoriteEntry::untitled("https://www.example.com/path");
        assert_eq!(e.display_title(), "example.com");
        let blank = FavoriteEntry::new("   ", "not a url");
        assert_eq!(blank.display_title(), "not a url");
    }

    #[test]
    fn shared_store_sees_mutations() {
        let shared = Arc::new(Mutex::new(abc()));
        let mut handle = Arc::clone(&shared);
        handle.reorder(0, 2).unwrap();
        let urls: Vec<_> = shared.fetch_all().unwrap().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, ["https://b.test", "https://c.test", "https://a.test"]);
    }
}
