//! Shield statistics shown in the banner above the grid.
//!
//! Counters are shared atomics so the content blocker can bump them from
//! any thread while the screen only reads snapshots.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Rough page-load time saved per blocked request, in milliseconds.
pub const TIME_SAVED_PER_BLOCK_MS: u64 = 50;

#[derive(Debug, Clone, Default)]
pub struct ShieldStats {
    ads: Arc<AtomicUsize>,
    trackers: Arc<AtomicUsize>,
    https_upgrades: Arc<AtomicUsize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub ads_blocked: usize,
    pub trackers_blocked: usize,
    pub https_upgrades: usize,
}

impl ShieldStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_ad(&self) {
        self.ads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tracker(&self) {
        self.trackers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_https_upgrade(&self) {
        self.https_upgrades.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ads_blocked: self.ads.load(Ordering::Relaxed),
            trackers_blocked: self.trackers.load(Ordering::Relaxed),
            https_upgrades: self.https_upgrades.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    pub fn total_blocked(&self) -> usize {
        self.ads_blocked + self.trackers_blocked
    }

    pub fn time_saved(&self) -> Duration {
        Duration::from_millis(TIME_SAVED_PER_BLOCK_MS.saturating_mul(self.total_blocked() as u64))
    }

    /// Banner cells: (value, label), in display order.
    pub fn banner_items(&self) -> [(String, &'static str); 4] {
        [
            (compact_count(self.ads_blocked), "Ads Blocked"),
            (compact_count(self.trackers_blocked), "Trackers Blocked"),
            (compact_count(self.https_upgrades), "HTTPS Upgrades"),
            (format_duration(self.time_saved()), "Time Saved"),
        ]
    }
}

/// `999`, `1.2K`, `3.4M`. Truncates to one decimal.
pub fn compact_count(n: usize) -> String {
    let (tenths, suffix) = match n {
        0..=999 => return n.to_string(),
        1_000..=999_999 => (n / 100, "K"),
        _ => (n / 100_000, "M"),
    };
    match tenths % 10 {
        0 => format!("{}{}", tenths / 10, suffix),
        d => format!("{}.{}{}", tenths / 10, d, suffix),
    }
}

/// Largest whole unit: `42s`, `7min`, `3h`, `12d`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3_600 {
        format!("{}min", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3_600)
    } else {
        format!("{}d", secs / 86_400)
    }
}
