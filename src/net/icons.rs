//! Tile thumbnail cache.
//!
//! Downloads run on the rayon pool and report back over `mpsc` channels.
//! [`IconCache::poll`] must be called every frame to collect finished work.

use std::collections::{HashMap, HashSet};
use std::sync::{mpsc, Arc};

use super::favicon::fetch_thumbnail;

/// Decoded thumbnail (RGBA8, row-major).
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IconError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("page advertises no icon")]
    NoIcon,
}

/// URL → thumbnail mapping used by the favorites grid.
pub trait IconCache {
    fn get(&self, url: &str) -> Option<&Thumbnail>;
    /// Start loading `url` unless it is loaded, in flight or known-bad.
    fn request(&mut self, url: &str);
    /// Collect finished loads. Returns the URLs that became available.
    fn poll(&mut self) -> Vec<String>;
    /// Forget everything about `url`; the next `request` refetches.
    fn evict(&mut self, url: &str);
}

type Loader = Arc<dyn Fn(&str) -> Result<Thumbnail, IconError> + Send + Sync>;

pub struct ThumbnailCache {
    pending: HashMap<String, mpsc::Receiver<Result<Thumbnail, IconError>>>,
    loaded: HashMap<String, Thumbnail>,
    failed: HashSet<String>,
    loader: Loader,
}

impl ThumbnailCache {
    /// Cache that fetches favicons from the network, downscaled to `size`.
    pub fn new(size: u32) -> Self {
        Self::with_loader(move |url| fetch_thumbnail(url, size))
    }

    /// Cache with a custom loader (used by tests and offline demos).
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn(&str) -> Result<Thumbnail, IconError> + Send + Sync + 'static,
    {
        Self {
            pending: HashMap::new(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
            loader: Arc::new(loader),
        }
    }

    /// Insert a thumbnail directly.
    pub fn insert(&mut self, url: &str, thumbnail: Thumbnail) {
        self.failed.remove(url);
        self.pending.remove(url);
        self.loaded.insert(url.to_string(), thumbnail);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.loaded.contains_key(url)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl IconCache for ThumbnailCache {
    fn get(&self, url: &str) -> Option<&Thumbnail> {
        self.loaded.get(url)
    }

    fn request(&mut self, url: &str) {
        if self.loaded.contains_key(url)
            || self.pending.contains_key(url)
            || self.failed.contains(url)
        {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let loader = Arc::clone(&self.loader);
        let url_owned = url.to_string();
        rayon::spawn(move || {
            let result = loader(&url_owned);
            let _ = tx.send(result);
        });

        log::debug!("Icon MISS: {}", url);
        self.pending.insert(url.to_string(), rx);
    }

    fn poll(&mut self) -> Vec<String> {
        let mut completed = Vec::new();
        let mut ready = Vec::new();
        for (url, rx) in &self.pending {
            match rx.try_recv() {
                Ok(Ok(thumb)) => {
                    self.loaded.insert(url.clone(), thumb);
                    ready.push(url.clone());
                    completed.push(url.clone());
                }
                Ok(Err(e)) => {
                    log::debug!("Icon for {} unavailable: {}", url, e);
                    self.failed.insert(url.clone());
                    completed.push(url.clone());
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.failed.insert(url.clone());
                    completed.push(url.clone());
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
        for url in completed {
            self.pending.remove(&url);
        }
        ready
    }

    fn evict(&mut self, url: &str) {
        let had = self.loaded.remove(url).is_some();
        self.pending.remove(url);
        self.failed.remove(url);
        log::debug!("Icon evicted: {} (cached: {})", url, had);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn pixel() -> Thumbnail {
        Thumbnail {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        }
    }

    fn poll_until_idle(cache: &mut ThumbnailCache) -> Vec<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut ready = Vec::new();
        while cache.pending_count() > 0 && Instant::now() < deadline {
            ready.extend(cache.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        ready
    }

    #[test]
    fn request_deduplicates() {
        let mut cache = ThumbnailCache::with_loader(|_| {
            std::thread::sleep(Duration::from_millis(50));
            Ok(pixel())
        });
        cache.request("https://example.com");
        cache.request("https://example.com");
        assert_eq!(cache.pending_count(), 1);
    }

    #[test]
    fn loads_and_remembers_failures() {
        let mut cache = ThumbnailCache::with_loader(|url| {
            if url.contains("good") {
                Ok(pixel())
            } else {
                Err(IconError::NoIcon)
            }
        });
        cache.request("https://good.test");
        cache.request("https://bad.test");
        let ready = poll_until_idle(&mut cache);

        assert_eq!(ready, vec!["https://good.test".to_string()]);
        assert!(cache.get("https://good.test").is_some());
        assert!(cache.get("https://bad.test").is_none());

        cache.request("https://bad.test");
        assert_eq!(cache.pending_count(), 0);
    }

    #[test]
    fn evict_forgets_everything() {
        let mut cache = ThumbnailCache::with_loader(|_| Err(IconError::NoIcon));
        cache.insert("https://x.test", pixel());
        cache.request("https://bad.test");
        poll_until_idle(&mut cache);

        cache.evict("https://x.test");
        cache.evict("https://bad.test");
        assert!(!cache.contains("https://x.test"));

        cache.request("https://bad.test");
        assert_eq!(cache.pending_count(), 1);
    }
}
