//! Network-backed collaborators: favicon discovery and the thumbnail cache.

pub mod favicon;
pub mod icons;

pub use icons::{IconCache, IconError, Thumbnail, ThumbnailCache};
