//! `FavoritesScreen` — the new-tab page.
//!
//! Layout:
//!
//! ┌─────────────────────────┐
//! │ [ads] [trk] [https] [⏱] │  ← Shield stats banner
//! ├─────────────────────────┤
//! │ [fav] [fav] [fav] [fav] │
//! │ [fav] [fav]             │  ← Favorites grid (long-press to reorder)
//! │                         │
//! │  [ Try private search ] │  ← Callout, only in private mode
//! └─────────────────────────┘
//!
//! The screen holds no favorites of its own; it drives a [`GridDataSource`]
//! and turns gestures and app events into store mutations or navigation
//! callbacks. Every decision lives here; [`view`] only paints and forwards
//! input.
//!
//! Gesture points handed to this type are in grid-local coordinates (origin
//! at the top-left of the first tile row).

pub mod data_source;
pub mod layout;
pub mod stats;
pub mod theme;
pub mod view;

use egui::{Pos2, Rect, Vec2};
use url::Url;

use crate::config::{NewTabConfig, MIN_IMAGE_ASPECT_RATIO};
use crate::events::{AppEvent, EventBus, Subscription};
use crate::favorites::{FavoriteEntry, FavoritesStore};
use crate::mobile::touch::LongPressPhase;
use crate::net::icons::IconCache;
use crate::privacy::{BrowsingMode, PrivacyMode};
use crate::search_engine::{SearchEngine, SearchEngineConfig};

use data_source::{GridDataSource, GridPosition};
use layout::{GridGeometry, SizeClasses};
use stats::ShieldStats;
use theme::Theme;

/// Callout size used until the view reports a measured one.
pub const DEFAULT_CALLOUT_SIZE: Vec2 = Vec2::new(280.0, 44.0);

/// Receives the screen's outward actions.
pub trait NavigationDelegate {
    fn on_url_selected(&mut self, url: &Url);
    fn on_promo_tapped(&mut self);
}

/// Collaborators the screen is built from.
pub struct ScreenParts {
    pub store: Box<dyn FavoritesStore>,
    pub icons: Box<dyn IconCache>,
    pub search: Box<dyn SearchEngineConfig>,
    pub navigation: Box<dyn NavigationDelegate>,
    pub privacy: PrivacyMode,
    pub stats: ShieldStats,
}

/// Modal UI currently shown over the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Sheet {
    /// Delete / Edit / Cancel for one favorite.
    Actions { entry: FavoriteEntry },
    EditPrompt(EditPrompt),
}

/// Two-field prompt, prefilled from the favorite being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EditPrompt {
    pub original: FavoriteEntry,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetChoice {
    Delete,
    Edit,
    Cancel,
}

/// The callout shows only in private mode, and only while the private
/// default engine is not already the promoted one.
pub fn callout_visible(mode: BrowsingMode, private_engine: SearchEngine, promoted: SearchEngine) -> bool {
    mode == BrowsingMode::Private && private_engine != promoted
}

pub struct FavoritesScreen {
    data_source: GridDataSource,
    icons: Box<dyn IconCache>,
    search: Box<dyn SearchEngineConfig>,
    navigation: Box<dyn NavigationDelegate>,
    privacy: PrivacyMode,
    stats: ShieldStats,
    subscription: Option<Subscription>,

    promoted_engine: SearchEngine,
    image_aspect_ratio: f32,
    callout_padding: f32,

    theme: Theme,
    geometry: GridGeometry,
    view_size: Vec2,
    content_size: Vec2,
    callout_size: Vec2,
    callout_visible: bool,
    callout_frame: Option<Rect>,
    bottom_inset: f32,
    sheet: Option<Sheet>,
    needs_redraw: bool,
    view_state: view::ViewState,
}

impl FavoritesScreen {
    pub fn new(parts: ScreenParts, bus: &EventBus, config: &NewTabConfig) -> Self {
        let view_size = Vec2::new(390.0, 844.0);
        let aspect = config.image_aspect_ratio.max(MIN_IMAGE_ASPECT_RATIO);
        let mut screen = Self {
            data_source: GridDataSource::new(parts.store),
            icons: parts.icons,
            search: parts.search,
            navigation: parts.navigation,
            theme: Theme::for_mode(parts.privacy.mode()),
            privacy: parts.privacy,
            stats: parts.stats,
            subscription: Some(bus.subscribe()),
            promoted_engine: config.promoted_engine,
            image_aspect_ratio: aspect,
            callout_padding: config.callout_padding,
            geometry: GridGeometry::new(SizeClasses::for_viewport(view_size), view_size, aspect),
            view_size,
            content_size: Vec2::ZERO,
            callout_size: DEFAULT_CALLOUT_SIZE,
            callout_visible: false,
            callout_frame: None,
            bottom_inset: 0.0,
            sheet: None,
            needs_redraw: true,
            view_state: view::ViewState::default(),
        };
        screen.relayout();
        screen.update_callout_visibility();
        screen
    }

    /// Stop receiving app events. Also happens on drop.
    pub fn teardown(&mut self) {
        if self.subscription.take().is_some() {
            log::debug!("Favorites screen unsubscribed");
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn data_source(&self) -> &GridDataSource {
        &self.data_source
    }

    pub fn is_editing(&self) -> bool {
        self.data_source.is_editing()
    }

    pub fn sheet(&self) -> Option<&Sheet> {
        self.sheet.as_ref()
    }

    pub fn edit_prompt_mut(&mut self) -> Option<&mut EditPrompt> {
        match self.sheet.as_mut() {
            Some(Sheet::EditPrompt(p)) => Some(p),
            _ => None,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn stats(&self) -> &ShieldStats {
        &self.stats
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn is_callout_visible(&self) -> bool {
        self.callout_visible
    }

    pub fn callout_frame(&self) -> Option<Rect> {
        self.callout_frame
    }

    pub fn bottom_inset(&self) -> f32 {
        self.bottom_inset
    }

    /// Whether the grid must be fully redrawn; clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// Drain pending app events. Returns how many were handled.
    pub fn poll_events(&mut self) -> usize {
        let events = match &self.subscription {
            Some(sub) => sub.drain(),
            None => return 0,
        };
        let n = events.len();
        for event in events {
            self.handle_event(event);
        }
        n
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        log::debug!("Favorites screen event: {:?}", event);
        match event {
            AppEvent::LegacyFavoritesMigrated => self.on_legacy_migration(),
            AppEvent::PrivacyModeChanged => self.on_privacy_mode_changed(),
        }
    }

    fn on_legacy_migration(&mut self) {
        // The re-fetch invalidates any drag in progress.
        if self.data_source.is_moving() {
            self.data_source.cancel_move();
            self.data_source.set_editing(false);
            log::debug!("Drag dropped by favorites re-fetch");
        }
        self.data_source.reload();
        self.relayout();
        self.needs_redraw = true;
    }

    fn on_privacy_mode_changed(&mut self) {
        self.theme = Theme::for_mode(self.privacy.mode());
        self.update_callout_visibility();
        self.needs_redraw = true;
    }

    // ─── Layout ──────────────────────────────────────────────────────────

    /// Recompute the grid for a new viewport, classifying it by size.
    pub fn set_viewport(&mut self, view: Vec2) {
        self.set_viewport_with_classes(SizeClasses::for_viewport(view), view);
    }

    pub fn set_viewport_with_classes(&mut self, classes: SizeClasses, view: Vec2) {
        let geometry = GridGeometry::new(classes, view, self.image_aspect_ratio);
        if geometry != self.geometry || view != self.view_size {
            self.geometry = geometry;
            self.view_size = view;
            self.needs_redraw = true;
            self.on_layout_changed(geometry.content_size(view.x, self.data_source.len()));
        }
    }

    fn relayout(&mut self) {
        let content = self.geometry.content_size(self.view_size.x, self.data_source.len());
        self.on_layout_changed(content);
    }

    /// Called after every layout pass with the grid's content size.
    pub fn on_layout_changed(&mut self, content_size: Vec2) {
        self.content_size = content_size;
        self.callout_frame = self
            .callout_visible
            .then(|| layout::callout_frame(content_size, self.callout_size, self.callout_padding));
    }

    /// Report the callout's measured size.
    pub fn set_callout_size(&mut self, size: Vec2) {
        if size != self.callout_size {
            self.callout_size = size;
            self.update_callout_visibility();
        }
    }

    pub fn update_callout_visibility(&mut self) {
        let private_engine = self.search.default_engine(BrowsingMode::Private);
        self.callout_visible = callout_visible(self.privacy.mode(), private_engine, self.promoted_engine);
        self.bottom_inset = layout::bottom_inset(self.callout_visible, self.callout_size.y, self.callout_padding);
        self.on_layout_changed(self.content_size);
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    pub fn handle_long_press(&mut self, phase: LongPressPhase, point: Pos2) {
        match phase {
            LongPressPhase::Began => {
                if self.sheet.is_some() || self.data_source.is_moving() {
                    return;
                }
                if let Some(index) = self.geometry.index_at(point, self.data_source.len()) {
                    self.data_source.set_editing(true);
                    self.data_source.begin_move(GridPosition(index));
                    log::debug!("Drag began at tile {}", index);
                }
            }
            LongPressPhase::Changed => {
                if !self.data_source.is_moving() {
                    return;
                }
                if let Some(target) = self.geometry.drop_index(point, self.data_source.len()) {
                    self.data_source.update_move(GridPosition(target));
                }
            }
            LongPressPhase::Ended => {
                if !self.data_source.is_moving() {
                    self.end_stray_drag();
                    return;
                }
                match self.data_source.commit_move() {
                    Ok(changed) => log::debug!("Drag committed (changed: {})", changed),
                    Err(e) => log::warn!("Reorder not saved: {}", e),
                }
                self.data_source.set_editing(false);
                self.relayout();
                self.needs_redraw = true;
            }
            LongPressPhase::Cancelled => {
                if !self.data_source.is_moving() {
                    self.end_stray_drag();
                    return;
                }
                self.data_source.cancel_move();
                self.data_source.set_editing(false);
                self.needs_redraw = true;
                log::debug!("Drag cancelled");
            }
        }
    }

    /// A long press ended with no move in flight. Editing is left set only
    /// while a sheet owns it.
    fn end_stray_drag(&mut self) {
        if self.sheet.is_none() {
            self.data_source.set_editing(false);
        }
    }

    pub fn handle_tap(&mut self, point: Pos2) {
        if let Some(index) = self.geometry.index_at(point, self.data_source.len()) {
            self.select(GridPosition(index));
        } else if self.callout_frame.map_or(false, |f| f.contains(point)) {
            self.tap_callout();
        }
    }

    /// Open the favorite at `pos`. Suppressed while editing.
    pub fn select(&mut self, pos: GridPosition) {
        if self.data_source.is_editing() || self.sheet.is_some() {
            return;
        }
        let entry = match self.data_source.item_at(pos) {
            Some(e) => e,
            None => return,
        };
        match Url::parse(&entry.url) {
            Ok(url) => self.navigation.on_url_selected(&url),
            Err(e) => log::debug!("Ignoring favorite with bad url {:?}: {}", entry.url, e),
        }
    }

    pub fn tap_callout(&mut self) {
        if self.callout_visible {
            self.navigation.on_promo_tapped();
        }
    }

    // ─── Edit / delete ───────────────────────────────────────────────────

    /// Present Delete / Edit / Cancel for the favorite at `pos`.
    pub fn request_edit(&mut self, pos: GridPosition) -> bool {
        if self.sheet.is_some() || self.data_source.is_moving() {
            return false;
        }
        let entry = match self.data_source.item_at(pos) {
            Some(e) => e.clone(),
            None => return false,
        };
        self.data_source.set_editing(true);
        self.sheet = Some(Sheet::Actions { entry });
        true
    }

    pub fn choose(&mut self, choice: SheetChoice) {
        let entry = match self.sheet.take() {
            Some(Sheet::Actions { entry }) => entry,
            other => {
                self.sheet = other;
                return;
            }
        };
        match choice {
            SheetChoice::Delete => {
                match self.data_source.remove(&entry) {
                    Ok(()) => self.icons.evict(&entry.url),
                    Err(e) => log::warn!("Delete of {} not saved: {}", entry.url, e),
                }
                self.data_source.set_editing(false);
                self.relayout();
                self.needs_redraw = true;
            }
            SheetChoice::Edit => {
                self.sheet = Some(Sheet::EditPrompt(EditPrompt {
                    title: entry.title.clone().unwrap_or_default(),
                    url: entry.url.clone(),
                    original: entry,
                }));
            }
            SheetChoice::Cancel => {
                self.data_source.set_editing(false);
            }
        }
    }

    /// Confirm the edit prompt. Returns whether the favorite was updated.
    /// The prompt closes either way.
    pub fn confirm_edit(&mut self) -> bool {
        let prompt = match self.sheet.take() {
            Some(Sheet::EditPrompt(p)) => p,
            other => {
                self.sheet = other;
                return false;
            }
        };
        self.data_source.set_editing(false);

        let title = prompt.title.trim();
        let url = prompt.url.trim();
        if title.is_empty() || url.is_empty() || Url::parse(url).is_err() {
            log::debug!("Edit declined: title {:?}, url {:?}", title, url);
            return false;
        }
        if let Err(e) = self.data_source.update(&prompt.original, title, url) {
            log::warn!("Edit of {} not saved: {}", prompt.original.url, e);
            return false;
        }
        if url != prompt.original.url {
            self.icons.evict(&prompt.original.url);
        }
        self.needs_redraw = true;
        true
    }

    pub fn dismiss_edit(&mut self) {
        if matches!(self.sheet, Some(Sheet::EditPrompt(_))) {
            self.sheet = None;
            self.data_source.set_editing(false);
        }
    }

    // ─── Icons ───────────────────────────────────────────────────────────

    /// Collect finished thumbnails and request missing ones.
    pub fn refresh_icons(&mut self) {
        if !self.icons.poll().is_empty() {
            self.needs_redraw = true;
        }
        for entry in self.data_source.entries() {
            if self.icons.get(&entry.url).is_none() {
                self.icons.request(&entry.url);
            }
        }
    }
}

impl Drop for FavoritesScreen {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::{MemoryStore, StoreError};
    use crate::net::icons::{IconError, Thumbnail, ThumbnailCache};
    use crate::search_engine::SearchSettings;
    use egui::{pos2, vec2};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex, RwLock};

    #[derive(Default)]
    struct Recorded {
        urls: Vec<String>,
        promos: usize,
    }

    struct Recorder(Rc<RefCell<Recorded>>);

    impl NavigationDelegate for Recorder {
        fn on_url_selected(&mut self, url: &Url) {
            self.0.borrow_mut().urls.push(url.to_string());
        }
        fn on_promo_tapped(&mut self) {
            self.0.borrow_mut().promos += 1;
        }
    }

    struct Fixture {
        screen: FavoritesScreen,
        store: Arc<Mutex<MemoryStore>>,
        search: Arc<RwLock<SearchSettings>>,
        privacy: PrivacyMode,
        bus: EventBus,
        nav: Rc<RefCell<Recorded>>,
    }

    fn pixel() -> Thumbnail {
        Thumbnail {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Reads from the shared store; every write fails.
    struct ReadOnly(Arc<Mutex<MemoryStore>>);

    impl FavoritesStore for ReadOnly {
        fn fetch_all(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
            self.0.fetch_all()
        }
        fn add(&mut self, _: FavoriteEntry) -> Result<(), StoreError> {
            Err(StoreError::NotFound("writes disabled".into()))
        }
        fn remove(&mut self, entry: &FavoriteEntry) -> Result<(), StoreError> {
            Err(StoreError::NotFound(entry.url.clone()))
        }
        fn update(&mut self, entry: &FavoriteEntry, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::NotFound(entry.url.clone()))
        }
        fn reorder(&mut self, from: usize, _: usize) -> Result<(), StoreError> {
            Err(StoreError::OutOfRange { index: from, len: 0 })
        }
    }

    fn fixture_with(entries: Vec<FavoriteEntry>, icons: ThumbnailCache) -> Fixture {
        fixture_backed(entries, icons, |store| Box::new(store) as Box<dyn FavoritesStore>)
    }

    fn fixture_backed<F>(entries: Vec<FavoriteEntry>, icons: ThumbnailCache, backing: F) -> Fixture
    where
        F: FnOnce(Arc<Mutex<MemoryStore>>) -> Box<dyn FavoritesStore>,
    {
        let store = Arc::new(Mutex::new(MemoryStore::with_entries(entries)));
        let search = Arc::new(RwLock::new(SearchSettings::default()));
        let privacy = PrivacyMode::default();
        let bus = EventBus::new();
        let nav = Rc::new(RefCell::new(Recorded::default()));
        let parts = ScreenParts {
            store: backing(Arc::clone(&store)),
            icons: Box::new(icons),
            search: Box::new(Arc::clone(&search)),
            navigation: Box::new(Recorder(Rc::clone(&nav))),
            privacy: privacy.clone(),
            stats: ShieldStats::new(),
        };
        let mut screen = FavoritesScreen::new(parts, &bus, &NewTabConfig::default());
        screen.set_viewport_with_classes(
            SizeClasses::new(layout::SizeClass::Compact, layout::SizeClass::Regular),
            vec2(390.0, 844.0),
        );
        Fixture { screen, store, search, privacy, bus, nav }
    }

    fn abc() -> Vec<FavoriteEntry> {
        vec![
            FavoriteEntry::new("A", "https://a.test"),
            FavoriteEntry::new("B", "https://b.test"),
            FavoriteEntry::new("C", "https://c.test"),
        ]
    }

    fn no_icons() -> ThumbnailCache {
        ThumbnailCache::with_loader(|_| Err(IconError::NoIcon))
    }

    fn fixture() -> Fixture {
        fixture_with(abc(), no_icons())
    }

    fn read_only_fixture(icons: ThumbnailCache) -> Fixture {
        fixture_backed(abc(), icons, |store| Box::new(ReadOnly(store)) as Box<dyn FavoritesStore>)
    }

    fn tile(f: &Fixture, index: usize) -> Pos2 {
        f.screen.geometry().cell_rect(index).center()
    }

    fn stored_urls(f: &Fixture) -> Vec<String> {
        f.store.lock().unwrap().entries().iter().map(|e| e.url.clone()).collect()
    }

    #[test]
    fn drag_commit_reorders() {
        let mut f = fixture();
        let (a, c) = (tile(&f, 0), tile(&f, 2));
        f.screen.handle_long_press(LongPressPhase::Began, a);
        assert!(f.screen.is_editing());
        f.screen.handle_long_press(LongPressPhase::Changed, c);
        f.screen.handle_long_press(LongPressPhase::Ended, c);
        assert!(!f.screen.is_editing());
        assert_eq!(stored_urls(&f), ["https://b.test", "https://c.test", "https://a.test"]);
    }

    #[test]
    fn drag_cancel_discards() {
        let mut f = fixture();
        let (a, c) = (tile(&f, 0), tile(&f, 2));
        f.screen.handle_long_press(LongPressPhase::Began, a);
        f.screen.handle_long_press(LongPressPhase::Changed, c);
        f.screen.handle_long_press(LongPressPhase::Cancelled, c);
        assert!(!f.screen.is_editing());
        assert!(!f.screen.data_source().is_moving());
        assert_eq!(stored_urls(&f), ["https://a.test", "https://b.test", "https://c.test"]);
    }

    #[test]
    fn failed_reorder_discards_drag() {
        let mut f = read_only_fixture(no_icons());
        let (a, c) = (tile(&f, 0), tile(&f, 2));
        f.screen.handle_long_press(LongPressPhase::Began, a);
        f.screen.handle_long_press(LongPressPhase::Changed, c);
        f.screen.handle_long_press(LongPressPhase::Ended, c);
        assert!(!f.screen.is_editing());
        assert!(!f.screen.data_source().is_moving());
        assert_eq!(f.screen.data_source().display_order(), vec![0, 1, 2]);
        assert_eq!(stored_urls(&f), ["https://a.test", "https://b.test", "https://c.test"]);
    }

    #[test]
    fn migration_mid_drag_ends_editing() {
        let mut f = fixture();
        f.screen.handle_long_press(LongPressPhase::Began, tile(&f, 0));
        assert!(f.screen.data_source().is_moving());

        f.bus.publish(AppEvent::LegacyFavoritesMigrated);
        f.screen.poll_events();
        assert!(!f.screen.data_source().is_moving());
        assert!(!f.screen.is_editing());

        let c = tile(&f, 2);
        f.screen.handle_long_press(LongPressPhase::Changed, c);
        f.screen.handle_long_press(LongPressPhase::Ended, c);
        assert!(!f.screen.is_editing());
        assert_eq!(stored_urls(&f), ["https://a.test", "https://b.test", "https://c.test"]);

        f.screen.handle_tap(tile(&f, 1));
        assert_eq!(f.nav.borrow().urls, vec!["https://b.test/".to_string()]);
    }

    #[test]
    fn stray_drag_end_keeps_sheet_editing() {
        let mut f = fixture();
        f.screen.data_source.set_editing(true);
        f.screen.handle_long_press(LongPressPhase::Cancelled, tile(&f, 0));
        assert!(!f.screen.is_editing());

        f.screen.request_edit(GridPosition(0));
        f.screen.handle_long_press(LongPressPhase::Ended, tile(&f, 0));
        assert!(f.screen.is_editing());
        assert!(f.screen.sheet().is_some());
    }

    #[test]
    fn long_press_on_empty_space_does_nothing() {
        let mut f = fixture();
        f.screen.handle_long_press(LongPressPhase::Began, pos2(380.0, 600.0));
        assert!(!f.screen.is_editing());
        f.screen.handle_long_press(LongPressPhase::Ended, pos2(380.0, 600.0));
        assert_eq!(stored_urls(&f).len(), 3);
    }

    #[test]
    fn tap_selects_valid_url_only() {
        let mut f = fixture_with(
            vec![FavoriteEntry::new("ok", "https://ok.test/"), FavoriteEntry::new("bad", "::not a url")],
            ThumbnailCache::with_loader(|_| Err(IconError::NoIcon)),
        );
        let (ok, bad) = (tile(&f, 0), tile(&f, 1));
        f.screen.handle_tap(ok);
        f.screen.handle_tap(bad);
        assert_eq!(f.nav.borrow().urls, vec!["https://ok.test/".to_string()]);
    }

    #[test]
    fn tap_ignored_while_editing() {
        let mut f = fixture();
        assert!(f.screen.request_edit(GridPosition(0)));
        f.screen.handle_tap(tile(&f, 1));
        assert!(f.nav.borrow().urls.is_empty());
    }

    #[test]
    fn delete_removes_entry_and_icon() {
        let mut icons = ThumbnailCache::with_loader(|_| Err(IconError::NoIcon));
        icons.insert("https://x.test", pixel());
        let mut f = fixture_with(
            vec![FavoriteEntry::new("X", "https://x.test"), FavoriteEntry::new("Y", "https://y.test")],
            icons,
        );
        assert!(f.screen.icons.get("https://x.test").is_some());

        f.screen.request_edit(GridPosition(0));
        f.screen.choose(SheetChoice::Delete);

        assert_eq!(stored_urls(&f), ["https://y.test"]);
        assert!(f.screen.icons.get("https://x.test").is_none());
        assert!(!f.screen.is_editing());
        assert!(f.screen.sheet().is_none());
    }

    #[test]
    fn failed_delete_keeps_icon() {
        let mut icons = no_icons();
        icons.insert("https://a.test", pixel());
        let mut f = read_only_fixture(icons);

        f.screen.request_edit(GridPosition(0));
        f.screen.choose(SheetChoice::Delete);

        assert_eq!(stored_urls(&f).len(), 3);
        assert!(f.screen.icons.get("https://a.test").is_some());
        assert!(!f.screen.is_editing());
    }

    #[test]
    fn cancel_resets_editing() {
        let mut f = fixture();
        f.screen.request_edit(GridPosition(1));
        assert!(f.screen.is_editing());
        f.screen.choose(SheetChoice::Cancel);
        assert!(!f.screen.is_editing());
        assert!(f.screen.sheet().is_none());
        assert_eq!(stored_urls(&f).len(), 3);
    }

    #[test]
    fn edit_prompt_is_prefilled_and_persists() {
        let mut f = fixture();
        f.screen.request_edit(GridPosition(1));
        f.screen.choose(SheetChoice::Edit);
        assert!(f.screen.is_editing());
        {
            let prompt = f.screen.edit_prompt_mut().unwrap();
            assert_eq!(prompt.title, "B");
            assert_eq!(prompt.url, "https://b.test");
            prompt.title = "Bee".into();
            prompt.url = "https://bee.test".into();
        }
        assert!(f.screen.confirm_edit());
        assert!(!f.screen.is_editing());
        let entries = f.store.lock().unwrap().entries().to_vec();
        assert_eq!(entries[1], FavoriteEntry::new("Bee", "https://bee.test"));
    }

    #[test]
    fn edit_with_empty_title_changes_nothing() {
        let mut f = fixture();
        let before = f.store.lock().unwrap().entries().to_vec();
        f.screen.request_edit(GridPosition(0));
        f.screen.choose(SheetChoice::Edit);
        f.screen.edit_prompt_mut().unwrap().title = "  ".into();
        assert!(!f.screen.confirm_edit());
        assert!(!f.screen.is_editing());
        assert_eq!(f.store.lock().unwrap().entries(), &before[..]);
    }

    #[test]
    fn edit_with_bad_url_changes_nothing() {
        let mut f = fixture();
        let before = f.store.lock().unwrap().entries().to_vec();
        f.screen.request_edit(GridPosition(0));
        f.screen.choose(SheetChoice::Edit);
        f.screen.edit_prompt_mut().unwrap().url = "no scheme here".into();
        assert!(!f.screen.confirm_edit());
        assert_eq!(f.store.lock().unwrap().entries(), &before[..]);
    }

    #[test]
    fn dismissed_prompt_resets_editing() {
        let mut f = fixture();
        f.screen.request_edit(GridPosition(0));
        f.screen.choose(SheetChoice::Edit);
        f.screen.dismiss_edit();
        assert!(!f.screen.is_editing());
        assert!(f.screen.sheet().is_none());
    }

    #[test]
    fn callout_visibility_rule() {
        use crate::search_engine::SearchEngine::*;
        assert!(callout_visible(BrowsingMode::Private, Google, DuckDuckGo));
        assert!(!callout_visible(BrowsingMode::Private, DuckDuckGo, DuckDuckGo));
        assert!(!callout_visible(BrowsingMode::Regular, Google, DuckDuckGo));
        assert!(!callout_visible(BrowsingMode::Regular, DuckDuckGo, DuckDuckGo));
    }

    #[test]
    fn privacy_event_toggles_callout_and_inset() {
        let mut f = fixture();
        assert!(!f.screen.is_callout_visible());
        assert_eq!(f.screen.bottom_inset(), 0.0);
        let regular_bg = f.screen.theme().background;

        f.privacy.set_private(true, &f.bus);
        assert_eq!(f.screen.poll_events(), 1);
        assert!(f.screen.is_callout_visible());
        assert_eq!(f.screen.bottom_inset(), DEFAULT_CALLOUT_SIZE.y + 2.0 * 16.0);
        assert_ne!(f.screen.theme().background, regular_bg);

        let frame = f.screen.callout_frame().unwrap();
        let content = f.screen.geometry().content_size(390.0, 3);
        assert_eq!(frame.center().x, 195.0);
        assert_eq!(frame.min.y, content.y + 16.0);

        f.screen.handle_tap(frame.center());
        assert_eq!(f.nav.borrow().promos, 1);

        f.search.write().unwrap().private = SearchEngine::DuckDuckGo;
        f.screen.update_callout_visibility();
        assert!(!f.screen.is_callout_visible());
        assert!(f.screen.callout_frame().is_none());
        f.screen.tap_callout();
        assert_eq!(f.nav.borrow().promos, 1);
    }

    #[test]
    fn migration_event_refetches() {
        let mut f = fixture();
        f.store.lock().unwrap().add(FavoriteEntry::new("D", "https://d.test")).unwrap();
        assert_eq!(f.screen.data_source().len(), 3);
        f.screen.take_redraw();

        f.bus.publish(AppEvent::LegacyFavoritesMigrated);
        f.screen.poll_events();
        assert_eq!(f.screen.data_source().len(), 4);
        assert!(f.screen.take_redraw());
    }

    #[test]
    fn teardown_unsubscribes() {
        let f = fixture();
        assert_eq!(f.bus.subscriber_count(), 1);
        let bus = f.bus.clone();
        drop(f);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(AppEvent::PrivacyModeChanged), 0);
    }
}
