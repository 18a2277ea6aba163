//! egui rendering for `FavoritesScreen`.
//!
//! Paints the banner, the tiles in display order, the callout and any open
//! sheet, and feeds pointer input through the [`TouchTracker`]. No decisions
//! are made here.

use std::collections::HashMap;
use std::time::Instant;

use egui::{pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::data_source::GridPosition;
use super::{FavoritesScreen, Sheet, SheetChoice};
use crate::favorites::FavoriteEntry;
use crate::mobile::touch::{TouchGesture, TouchTracker};

pub const BANNER_HEIGHT: f32 = 96.0;
const TILE_MARGIN: f32 = 6.0;
const LABEL_HEIGHT: f32 = 18.0;
const TILE_ROUNDING: f32 = 10.0;
/// Pointer id used for mouse / emulated single touch.
const POINTER_ID: u64 = 0;

/// Per-frame UI state that has no meaning outside rendering.
#[derive(Default)]
pub struct ViewState {
    touch: TouchTracker,
    textures: HashMap<String, egui::TextureHandle>,
}

impl FavoritesScreen {
    /// Draw the whole screen into `ui`.
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.poll_events();
        self.refresh_icons();
        if self.take_redraw() {
            let icons = &self.icons;
            self.view_state.textures.retain(|url, _| icons.get(url).is_some());
            ui.ctx().request_repaint();
        }

        ui.painter().rect_filled(ui.max_rect(), 0.0, self.theme.background);
        self.draw_banner(ui);
        // Measured outside the scroll area, whose content height is unbounded.
        let grid_view = ui.available_size();
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| self.draw_grid(ui, grid_view));
        self.draw_sheet(ui.ctx());
    }

    fn draw_banner(&self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), BANNER_HEIGHT), Sense::hover());
        let painter = ui.painter();
        let card = rect.shrink(8.0);
        painter.rect_filled(card, 12.0, self.theme.banner_tint);

        let items = self.stats.snapshot().banner_items();
        let column = card.width() / items.len() as f32;
        for (i, (value, label)) in items.iter().enumerate() {
            let cx = card.left() + column * (i as f32 + 0.5);
            painter.text(
                pos2(cx, card.center().y - 10.0),
                Align2::CENTER_CENTER,
                value,
                FontId::proportional(22.0),
                self.theme.banner_text,
            );
            painter.text(
                pos2(cx, card.center().y + 14.0),
                Align2::CENTER_CENTER,
                *label,
                FontId::proportional(11.0),
                self.theme.banner_text,
            );
        }
    }

    /// `view` is the space left for the grid below the banner.
    fn draw_grid(&mut self, ui: &mut egui::Ui, view: Vec2) {
        let width = ui.available_width();
        self.set_viewport(vec2(width, view.y));

        let callout_text = format!("Try {} in private tabs", self.promoted_engine.display_name());
        let galley = ui
            .painter()
            .layout_no_wrap(callout_text.clone(), FontId::proportional(15.0), Color32::WHITE);
        self.set_callout_size(galley.size() + vec2(32.0, 20.0));

        let geom = self.geometry;
        let content = geom.content_size(width, self.data_source.len());
        let (rect, response) =
            ui.allocate_exact_size(vec2(width, content.y + self.bottom_inset), Sense::click_and_drag());
        self.on_layout_changed(content);
        self.handle_pointer(ui, rect.min.to_vec2(), &response);

        let painter = ui.painter_at(rect);
        let offset = rect.min.to_vec2();
        let dragged = self.data_source.moving_index();
        let entries: Vec<(usize, FavoriteEntry)> = self
            .data_source
            .display_order()
            .into_iter()
            .filter_map(|idx| self.data_source.entries().get(idx).cloned().map(|e| (idx, e)))
            .collect();
        for (slot, (idx, entry)) in entries.iter().enumerate() {
            let cell = geom.cell_rect(slot).translate(offset);
            self.paint_tile(ui.ctx(), &painter, cell, entry, dragged == Some(*idx));
        }

        if let Some(frame) = self.callout_frame {
            let frame = frame.translate(offset);
            painter.rect_filled(frame, frame.height() / 2.0, self.theme.banner_tint);
            painter.text(frame.center(), Align2::CENTER_CENTER, callout_text, FontId::proportional(15.0), Color32::WHITE);
        }
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, origin: Vec2, response: &egui::Response) {
        let now = Instant::now();
        let (pressed, released, down, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.interact_pos(),
            )
        });
        let local: Pos2 = match pos {
            Some(p) => p - origin,
            None => return,
        };

        let mut gestures = Vec::with_capacity(3);
        let touch = &mut self.view_state.touch;
        if pressed && response.hovered() {
            gestures.push(touch.touch_start(local, POINTER_ID, now));
        }
        if down {
            gestures.push(touch.touch_move(local, POINTER_ID, now));
            gestures.push(touch.tick(now));
            // Keep frames coming so the hold threshold is noticed.
            ui.ctx().request_repaint();
        }
        if released {
            gestures.push(touch.touch_end(local, POINTER_ID, now));
        }
        for gesture in gestures {
            match gesture {
                TouchGesture::Tap { pos } => self.handle_tap(pos),
                TouchGesture::LongPress { phase, pos } => self.handle_long_press(phase, pos),
                TouchGesture::None => {}
            }
        }

        if response.secondary_clicked() {
            if let Some(index) = self.geometry.index_at(local, self.data_source.len()) {
                self.request_edit(GridPosition(index));
            }
        }
    }

    fn paint_tile(&mut self, ctx: &egui::Context, painter: &egui::Painter, cell: Rect, entry: &FavoriteEntry, lifted: bool) {
        let inner = cell.shrink(TILE_MARGIN);
        let side = inner.width().min(inner.height() - LABEL_HEIGHT).max(0.0);
        let thumb = Rect::from_min_size(pos2(inner.center().x - side / 2.0, inner.top()), vec2(side, side));
        let title = entry.display_title();

        painter.rect_filled(thumb, TILE_ROUNDING, self.theme.tile_placeholder);
        match self.texture_for(ctx, &entry.url) {
            Some(tex) => {
                let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                painter.image(tex, thumb.shrink(side * 0.2), uv, Color32::WHITE);
            }
            None => {
                let letter: String = title.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default();
                painter.text(
                    thumb.center(),
                    Align2::CENTER_CENTER,
                    letter,
                    FontId::proportional(side * 0.4),
                    self.theme.tile_label,
                );
            }
        }
        if lifted {
            painter.rect_stroke(thumb, TILE_ROUNDING, Stroke::new(2.0, self.theme.banner_tint));
        }
        painter.text(
            pos2(inner.center().x, thumb.bottom() + 4.0),
            Align2::CENTER_TOP,
            truncate_str(&title, 14),
            FontId::proportional(12.0),
            self.theme.tile_label,
        );
    }

    fn texture_for(&mut self, ctx: &egui::Context, url: &str) -> Option<egui::TextureId> {
        if let Some(tex) = self.view_state.textures.get(url) {
            return Some(tex.id());
        }
        let thumb = self.icons.get(url)?;
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [thumb.width as usize, thumb.height as usize],
            &thumb.rgba,
        );
        let handle = ctx.load_texture(format!("favicon:{}", url), image, egui::TextureOptions::LINEAR);
        let id = handle.id();
        self.view_state.textures.insert(url.to_string(), handle);
        Some(id)
    }

    fn draw_sheet(&mut self, ctx: &egui::Context) {
        let mut choice = None;
        let mut confirm = false;
        let mut dismiss = false;

        match &mut self.sheet {
            Some(Sheet::Actions { entry }) => {
                egui::Window::new(truncate_str(&entry.display_title(), 32))
                    .id(egui::Id::new("favorite_actions"))
                    .collapsible(false)
                    .resizable(false)
                    .anchor(Align2::CENTER_BOTTOM, vec2(0.0, -24.0))
                    .show(ctx, |ui| {
                        ui.vertical_centered_justified(|ui| {
                            if ui.button(egui::RichText::new("Delete").color(Color32::from_rgb(229, 57, 53))).clicked() {
                                choice = Some(SheetChoice::Delete);
                            }
                            if ui.button("Edit").clicked() {
                                choice = Some(SheetChoice::Edit);
                            }
                            if ui.button("Cancel").clicked() {
                                choice = Some(SheetChoice::Cancel);
                            }
                        });
                    });
            }
            Some(Sheet::EditPrompt(prompt)) => {
                egui::Window::new("Edit Favorite")
                    .id(egui::Id::new("favorite_edit"))
                    .collapsible(false)
                    .resizable(false)
                    .anchor(Align2::CENTER_CENTER, vec2(0.0, 0.0))
                    .show(ctx, |ui| {
                        ui.add(egui::TextEdit::singleline(&mut prompt.title).hint_text("Title"));
                        ui.add(egui::TextEdit::singleline(&mut prompt.url).hint_text("URL"));
                        ui.horizontal(|ui| {
                            if ui.button("Cancel").clicked() {
                                dismiss = true;
                            }
                            if ui.button("OK").clicked() {
                                confirm = true;
                            }
                        });
                    });
            }
            None => {}
        }

        if let Some(choice) = choice {
            self.choose(choice);
        }
        if confirm {
            self.confirm_edit();
        }
        if dismiss {
            self.dismiss_edit();
        }
    }
}

/// Truncate `s` to at most `max_chars` characters, ending in `…` if cut.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let t: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", t)
    }
}
