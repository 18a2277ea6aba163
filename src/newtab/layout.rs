//! Grid geometry for the favorites screen.
//!
//! Pure functions of the viewport: column policy, tile size, hit testing and
//! the callout placement below the last row.

use egui::{pos2, vec2, Pos2, Rect, Vec2};

/// Width at which a compact-width, regular-height screen (split-screen
/// tablet, large phone) gets the wider column count.
pub const HALF_TABLET_WIDTH: f32 = 507.0;

/// Extra column appended to the base count.
pub const RESERVED_TRAILING_SLOTS: usize = 1;

/// Vertical space reserved under the thumbnail for the tile label,
/// expressed as a reduction of the aspect ratio.
pub const LABEL_ASPECT_RESERVE: f32 = 0.1;

/// Viewports narrower than this use compact horizontal sizing.
const COMPACT_WIDTH_BELOW: f32 = 600.0;
/// Viewports shorter than this use compact vertical sizing.
const COMPACT_HEIGHT_BELOW: f32 = 480.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Compact,
    Regular,
}

/// Horizontal / vertical size classes of the hosting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeClasses {
    pub horizontal: SizeClass,
    pub vertical: SizeClass,
}

impl SizeClasses {
    pub fn new(horizontal: SizeClass, vertical: SizeClass) -> Self {
        Self { horizontal, vertical }
    }

    /// Classify a window by its size in points.
    pub fn for_viewport(size: Vec2) -> Self {
        let class = |v: f32, limit: f32| if v < limit { SizeClass::Compact } else { SizeClass::Regular };
        Self {
            horizontal: class(size.x, COMPACT_WIDTH_BELOW),
            vertical: class(size.y, COMPACT_HEIGHT_BELOW),
        }
    }
}

/// Base column policy, before the reserved trailing slot.
fn base_columns(classes: SizeClasses, view: Vec2) -> usize {
    match (classes.horizontal, classes.vertical) {
        (SizeClass::Compact, SizeClass::Compact) => 5,
        (SizeClass::Compact, SizeClass::Regular) if view.x >= HALF_TABLET_WIDTH => 4,
        (SizeClass::Compact, SizeClass::Regular) => 3,
        (SizeClass::Regular, _) if view.y > view.x => 4,
        (SizeClass::Regular, _) => 5,
    }
}

pub fn column_count(classes: SizeClasses, view: Vec2) -> usize {
    base_columns(classes, view) + RESERVED_TRAILING_SLOTS
}

pub fn grid_padding(horizontal: SizeClass) -> f32 {
    match horizontal {
        SizeClass::Compact => 6.0,
        SizeClass::Regular => 20.0,
    }
}

/// Tile size: equal-width columns after padding; height leaves room for the
/// label under an `image_aspect_ratio` thumbnail.
pub fn cell_size(grid_width: f32, columns: usize, horizontal: SizeClass, image_aspect_ratio: f32) -> Vec2 {
    let columns = columns.max(1) as f32;
    let width = ((grid_width - grid_padding(horizontal)) / columns).floor().max(0.0);
    let height = (width / (image_aspect_ratio - LABEL_ASPECT_RESERVE)).floor();
    vec2(width, height)
}

/// Bottom inset that keeps the callout clear of the last row.
pub fn bottom_inset(callout_visible: bool, callout_height: f32, padding: f32) -> f32 {
    if callout_visible {
        callout_height + padding * 2.0
    } else {
        0.0
    }
}

/// Resolved geometry for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: usize,
    pub cell: Vec2,
    /// Left inset so the row is centred within the padding.
    pub inset_x: f32,
}

impl GridGeometry {
    pub fn new(classes: SizeClasses, view: Vec2, image_aspect_ratio: f32) -> Self {
        let columns = column_count(classes, view);
        let cell = cell_size(view.x, columns, classes.horizontal, image_aspect_ratio);
        let used = cell.x * columns as f32;
        Self {
            columns,
            cell,
            inset_x: ((view.x - used) / 2.0).max(0.0),
        }
    }

    pub fn rows(&self, items: usize) -> usize {
        (items + self.columns - 1) / self.columns
    }

    /// Tile rectangle for `index`, in grid-local coordinates.
    pub fn cell_rect(&self, index: usize) -> Rect {
        let col = index % self.columns;
        let row = index / self.columns;
        Rect::from_min_size(
            pos2(self.inset_x + col as f32 * self.cell.x, row as f32 * self.cell.y),
            self.cell,
        )
    }

    /// Index of the tile under `point`, if one of `items` tiles is there.
    pub fn index_at(&self, point: Pos2, items: usize) -> Option<usize> {
        if self.cell.x <= 0.0 || self.cell.y <= 0.0 || point.y < 0.0 || point.x < self.inset_x {
            return None;
        }
        let col = ((point.x - self.inset_x) / self.cell.x) as usize;
        let row = (point.y / self.cell.y) as usize;
        let index = row * self.columns + col;
        (col < self.columns && index < items).then_some(index)
    }

    /// Nearest valid drop index for a drag at `point`, clamped to the grid.
    pub fn drop_index(&self, point: Pos2, items: usize) -> Option<usize> {
        if items == 0 || self.cell.x <= 0.0 || self.cell.y <= 0.0 {
            return None;
        }
        let max_col = self.columns - 1;
        let col = (((point.x - self.inset_x) / self.cell.x).max(0.0) as usize).min(max_col);
        let row = (point.y / self.cell.y).max(0.0) as usize;
        Some((row * self.columns + col).min(items - 1))
    }

    pub fn content_size(&self, view_width: f32, items: usize) -> Vec2 {
        vec2(view_width, self.rows(items) as f32 * self.cell.y)
    }
}

/// Callout frame: centred horizontally, `padding` below the grid content.
pub fn callout_frame(content_size: Vec2, callout_size: Vec2, padding: f32) -> Rect {
    Rect::from_min_size(
        pos2((content_size.x - callout_size.x) / 2.0, content_size.y + padding),
        callout_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::SizeClass::{Compact, Regular};

    fn cols(h: SizeClass, v: SizeClass, w: f32, ht: f32) -> usize {
        column_count(SizeClasses::new(h, v), vec2(w, ht))
    }

    #[test]
    fn column_policy_table() {
        assert_eq!(cols(Compact, Compact, 844.0, 390.0), 5 + 1);
        assert_eq!(cols(Compact, Regular, 507.0, 900.0), 4 + 1);
        assert_eq!(cols(Compact, Regular, 600.0, 900.0), 4 + 1);
        assert_eq!(cols(Compact, Regular, 506.9, 900.0), 3 + 1);
        assert_eq!(cols(Compact, Regular, 390.0, 844.0), 3 + 1);
        assert_eq!(cols(Regular, Regular, 820.0, 1180.0), 4 + 1);
        assert_eq!(cols(Regular, Regular, 1180.0, 820.0), 5 + 1);
        assert_eq!(cols(Regular, Compact, 1000.0, 1000.0), 5 + 1);
    }

    #[test]
    fn cells_fit_grid_width() {
        for &h in &[Compact, Regular] {
            for w in [120.0_f32, 320.0, 375.0, 414.0, 507.0, 768.0, 1024.0, 1366.0] {
                for columns in 1..=6 {
                    let cell = cell_size(w, columns, h, 1.0);
                    assert!(cell.x * columns as f32 <= w, "w={} columns={} cell={:?}", w, columns, cell);
                }
            }
        }
    }

    #[test]
    fn cell_size_formula() {
        // (375 - 6) / 4 = 92.25 → 92; 92 / 0.9 = 102.2 → 102
        assert_eq!(cell_size(375.0, 4, Compact, 1.0), vec2(92.0, 102.0));
        // (1024 - 20) / 6 = 167.33 → 167; 167 / 1.4 = 119.28 → 119
        assert_eq!(cell_size(1024.0, 6, Regular, 1.5), vec2(167.0, 119.0));
    }

    #[test]
    fn viewport_classification() {
        assert_eq!(
            SizeClasses::for_viewport(vec2(390.0, 844.0)),
            SizeClasses::new(Compact, Regular)
        );
        assert_eq!(
            SizeClasses::for_viewport(vec2(844.0, 390.0)),
            SizeClasses::new(Regular, Compact)
        );
    }

    #[test]
    fn hit_testing() {
        let geom = GridGeometry::new(SizeClasses::new(Compact, Regular), vec2(390.0, 844.0), 1.0);
        assert_eq!(geom.columns, 4);
        let first = geom.cell_rect(0);
        let fifth = geom.cell_rect(4);
        assert_eq!(geom.index_at(first.center(), 10), Some(0));
        assert_eq!(geom.index_at(fifth.center(), 10), Some(4));
        assert_eq!(geom.index_at(fifth.center(), 4), None);
        assert_eq!(geom.index_at(pos2(389.9, 1.0), 10), None);
        assert_eq!(geom.drop_index(pos2(10_000.0, 10_000.0), 10), Some(9));
        assert_eq!(geom.drop_index(pos2(-5.0, -5.0), 10), Some(0));
    }

    #[test]
    fn callout_below_content() {
        let frame = callout_frame(vec2(400.0, 300.0), vec2(200.0, 40.0), 16.0);
        assert_eq!(frame.min, pos2(100.0, 316.0));
        assert_eq!(frame.center().x, 200.0);
        assert_eq!(bottom_inset(true, 40.0, 16.0), 72.0);
        assert_eq!(bottom_inset(false, 40.0, 16.0), 0.0);
    }
}
