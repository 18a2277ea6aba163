//! One-shot import of legacy bookmarks into the favorites store.
//!
//! The legacy file is a JSON array of `{ "title", "url", "is_folder" }`
//! records. Folders, unparsable URLs and URLs already present are skipped.
//! After a successful import the file is renamed to `*.migrated` so the
//! import never runs twice, and [`AppEvent::LegacyFavoritesMigrated`] is
//! published.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{FavoriteEntry, FavoritesStore, StoreError};
use crate::events::{AppEvent, EventBus};

#[derive(Debug, Deserialize)]
struct LegacyBookmark {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    is_folder: bool,
}

/// Outcome of a migration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// No legacy file present.
    NothingToDo,
    /// Import finished; `imported` entries were added.
    Completed { imported: usize, skipped: usize },
}

pub fn migrated_path(legacy: &Path) -> PathBuf {
    legacy.with_extension("migrated")
}

pub fn migrate_legacy(
    legacy: &Path,
    store: &mut dyn FavoritesStore,
    bus: &EventBus,
) -> Result<Migration, StoreError> {
    if !legacy.exists() {
        return Ok(Migration::NothingToDo);
    }

    let content = fs::read_to_string(legacy).map_err(|source| StoreError::Io {
        path: legacy.to_path_buf(),
        source,
    })?;
    let bookmarks: Vec<LegacyBookmark> =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: legacy.to_path_buf(),
            source,
        })?;

    let mut known: Vec<String> = store.fetch_all()?.into_iter().map(|e| e.url).collect();
    let mut imported = 0;
    let mut skipped = 0;

    for bm in bookmarks {
        let url = match bm.url {
            Some(u) if !bm.is_folder && url::Url::parse(&u).is_ok() => u,
            _ => {
                skipped += 1;
                continue;
            }
        };
        if known.contains(&url) {
            skipped += 1;
            continue;
        }
        known.push(url.clone());
        store.add(FavoriteEntry {
            title: bm.title.filter(|t| !t.trim().is_empty()),
            url,
        })?;
        imported += 1;
    }

    fs::rename(legacy, migrated_path(legacy)).map_err(|source| StoreError::Io {
        path: legacy.to_path_buf(),
        source,
    })?;

    log::info!(
        "Legacy favorites migrated: {} imported, {} skipped",
        imported,
        skipped
    );
    bus.publish(AppEvent::LegacyFavoritesMigrated);

    Ok(Migration::Completed { imported, skipped })
}
