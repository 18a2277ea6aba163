//! Favorites grid data source.
//!
//! Holds a snapshot of the store ordering, the editing flag, and the state of
//! an interactive move. Positions are only valid for the current snapshot;
//! stale positions resolve to `None`.

use crate::favorites::{FavoriteEntry, FavoritesStore, StoreError};

/// Index into the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MoveState {
    from: usize,
    to: usize,
}

pub struct GridDataSource {
    store: Box<dyn FavoritesStore>,
    entries: Vec<FavoriteEntry>,
    editing: bool,
    moving: Option<MoveState>,
}

impl GridDataSource {
    pub fn new(store: Box<dyn FavoritesStore>) -> Self {
        let mut ds = Self {
            store,
            entries: Vec::new(),
            editing: false,
            moving: None,
        };
        ds.reload();
        ds
    }

    /// Re-read the store. A failed fetch leaves the grid empty.
    pub fn reload(&mut self) {
        self.moving = None;
        self.entries = match self.store.fetch_all() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Favorites fetch failed, showing none: {}", e);
                Vec::new()
            }
        };
        log::debug!("Favorites snapshot: {} entries", self.entries.len());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn item_at(&self, pos: GridPosition) -> Option<&FavoriteEntry> {
        self.entries.get(pos.0)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    // ─── Interactive move ────────────────────────────────────────────────

    pub fn is_moving(&self) -> bool {
        self.moving.is_some()
    }

    /// Start dragging the tile at `pos`. Returns `false` for a stale position.
    pub fn begin_move(&mut self, pos: GridPosition) -> bool {
        if pos.0 >= self.entries.len() {
            return false;
        }
        self.moving = Some(MoveState { from: pos.0, to: pos.0 });
        true
    }

    pub fn update_move(&mut self, target: GridPosition) {
        let len = self.entries.len();
        if let Some(m) = self.moving.as_mut() {
            m.to = target.0.min(len.saturating_sub(1));
        }
    }

    /// Order tiles should be drawn in: the snapshot with the dragged tile
    /// moved to its current target.
    pub fn display_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        if let Some(m) = self.moving {
            let dragged = order.remove(m.from);
            order.insert(m.to, dragged);
        }
        order
    }

    /// Source index of the tile being dragged.
    pub fn moving_index(&self) -> Option<usize> {
        self.moving.map(|m| m.from)
    }

    /// Persist the move and refresh the snapshot. Returns whether the order
    /// changed.
    pub fn commit_move(&mut self) -> Result<bool, StoreError> {
        let m = match self.moving.take() {
            Some(m) => m,
            None => return Ok(false),
        };
        if m.from == m.to {
            return Ok(false);
        }
        let result = self.store.reorder(m.from, m.to);
        self.reload();
        result.map(|_| true)
    }

    pub fn cancel_move(&mut self) {
        self.moving = None;
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    pub fn remove(&mut self, entry: &FavoriteEntry) -> Result<(), StoreError> {
        let result = self.store.remove(entry);
        self.reload();
        result
    }

    pub fn update(&mut self, entry: &FavoriteEntry, title: &str, url: &str) -> Result<(), StoreError> {
        let result = self.store.update(entry, title, url);
        self.reload();
        result
    }
}
