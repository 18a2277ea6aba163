use egui::Color32;

use crate::privacy::BrowsingMode;

/// Colours that change with the browsing mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color32,
    pub banner_tint: Color32,
    pub banner_text: Color32,
    pub tile_label: Color32,
    pub tile_placeholder: Color32,
}

impl Theme {
    pub fn for_mode(mode: BrowsingMode) -> Self {
        match mode {
            BrowsingMode::Regular => Self {
                background: Color32::from_rgb(246, 247, 250),
                banner_tint: Color32::from_rgb(251, 84, 43),
                banner_text: Color32::WHITE,
                tile_label: Color32::from_gray(60),
                tile_placeholder: Color32::from_gray(220),
            },
            BrowsingMode::Private => Self {
                background: Color32::from_rgb(30, 27, 46),
                banner_tint: Color32::from_rgb(106, 79, 191),
                banner_text: Color32::from_gray(235),
                tile_label: Color32::from_gray(200),
                tile_placeholder: Color32::from_gray(64),
            },
        }
    }
}
