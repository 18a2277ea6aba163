use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use alice_newtab::config::NewTabConfig;
use alice_newtab::events::EventBus;
use alice_newtab::favorites::json_store::JsonFileStore;
use alice_newtab::favorites::migrate::{migrate_legacy, Migration};
use alice_newtab::net::icons::ThumbnailCache;
use alice_newtab::newtab::stats::ShieldStats;
use alice_newtab::newtab::{FavoritesScreen, NavigationDelegate, ScreenParts};
use alice_newtab::privacy::PrivacyMode;

const CONFIG_ENV: &str = "ALICE_NEWTAB_CONFIG";

/// Navigation sink for the standalone demo: selections are only logged.
struct LogNavigation;

impl NavigationDelegate for LogNavigation {
    fn on_url_selected(&mut self, url: &url::Url) {
        log::info!("Open {}", url);
    }

    fn on_promo_tapped(&mut self) {
        log::info!("Private search promo tapped");
    }
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".alice-newtab/newtab.json"))
}

fn main() -> eframe::Result {
    env_logger::init();

    let path = config_path();
    let config = NewTabConfig::load_or_default(&path);
    if !path.exists() {
        // First run: leave an editable copy of the defaults behind.
        if let Err(e) = config.save(&path) {
            log::warn!("{}", e);
        }
    }
    log::info!("Config: {} (data in {})", path.display(), config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([390.0, 844.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ALICE Browser — New Tab",
        options,
        Box::new(move |cc| {
            // Load Japanese font (Hiragino Sans on macOS)
            let mut fonts = egui::FontDefinitions::default();
            let font_paths = [
                "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
                "/System/Library/Fonts/HiraginoSans-W3.otf",
            ];
            for path in &font_paths {
                if let Ok(data) = std::fs::read(path) {
                    fonts
                        .font_data
                        .insert("japanese".to_owned(), egui::FontData::from_owned(data));
                    if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
                        family.push("japanese".to_owned());
                    }
                    break;
                }
            }
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(NewTabApp::new(config)))
        }),
    )
}

struct NewTabApp {
    screen: FavoritesScreen,
    bus: EventBus,
    privacy: PrivacyMode,
}

impl NewTabApp {
    fn new(config: NewTabConfig) -> Self {
        let bus = EventBus::new();
        let privacy = PrivacyMode::default();
        let search = Arc::new(RwLock::new(config.search.clone()));

        let parts = ScreenParts {
            store: Box::new(JsonFileStore::new(config.favorites_path())),
            icons: Box::new(ThumbnailCache::new(config.thumbnail_size)),
            search: Box::new(Arc::clone(&search)),
            navigation: Box::new(LogNavigation),
            privacy: privacy.clone(),
            stats: ShieldStats::new(),
        };
        let screen = FavoritesScreen::new(parts, &bus, &config);

        // Runs after the screen subscribed so it picks up imported entries.
        let mut importer = JsonFileStore::new(config.favorites_path());
        match migrate_legacy(&config.legacy_bookmarks_path(), &mut importer, &bus) {
            Ok(Migration::Completed { imported, skipped }) => {
                log::info!("Legacy bookmarks: {} imported, {} skipped", imported, skipped)
            }
            Ok(Migration::NothingToDo) => {}
            Err(e) => log::warn!("Legacy bookmark migration failed: {}", e),
        }

        Self {
            screen,
            bus,
            privacy,
        }
    }

    fn settings_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut private = self.privacy.is_private();
            if ui.checkbox(&mut private, "Private").changed() {
                self.privacy.set_private(private, &self.bus);
            }
        });
    }
}

impl eframe::App for NewTabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("settings").show(ctx, |ui| self.settings_bar(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.screen.ui(ui));
    }
}
