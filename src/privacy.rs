//! Private browsing switch shared across the app.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::events::{AppEvent, EventBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowsingMode {
    Regular,
    Private,
}

/// Shared private-mode flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct PrivacyMode {
    private: Arc<AtomicBool>,
}

impl PrivacyMode {
    pub fn new(private: bool) -> Self {
        Self {
            private: Arc::new(AtomicBool::new(private)),
        }
    }

    pub fn is_private(&self) -> bool {
        self.private.load(Ordering::Relaxed)
    }

    pub fn mode(&self) -> BrowsingMode {
        if self.is_private() {
            BrowsingMode::Private
        } else {
            BrowsingMode::Regular
        }
    }

    /// Switch modes, publishing [`AppEvent::PrivacyModeChanged`] only when the
    /// value actually changes.
    pub fn set_private(&self, private: bool, bus: &EventBus) {
        if self.private.swap(private, Ordering::Relaxed) != private {
            log::info!("Private browsing {}", if private { "on" } else { "off" });
            bus.publish(AppEvent::PrivacyModeChanged);
        }
    }
}
