//! Favicon discovery and download.
//!
//! Fetch → parse `<link rel=…>` → pick best icon → download → decode →
//! downscale. Everything here is blocking; callers run it off the UI thread.

use scraper::{Html, Selector};
use url::Url;

use super::icons::{IconError, Thumbnail};

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; ALICE-Browser/0.2; ",
    "+https://github.com/ext-sakamoro/ALICE-Browser)"
);

/// Candidate icon advertised by a page.
#[derive(Debug, Clone, PartialEq)]
pub struct IconLink {
    pub url: Url,
    /// Largest edge from the `sizes` attribute, 0 when absent or `any`.
    pub size: u32,
    pub touch_icon: bool,
}

fn client() -> Result<reqwest::blocking::Client, IconError> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| IconError::Request(e.to_string()))
}

/// Collect icon links from a document, resolved against `base`.
pub fn icon_links(html: &str, base: &Url) -> Vec<IconLink> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("link[rel][href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|el| {
            let rel = el.value().attr("rel")?.to_ascii_lowercase();
            let tokens: Vec<&str> = rel.split_ascii_whitespace().collect();
            let touch_icon = tokens
                .iter()
                .any(|t| *t == "apple-touch-icon" || *t == "apple-touch-icon-precomposed");
            if !touch_icon && !tokens.contains(&"icon") {
                return None;
            }
            let url = base.join(el.value().attr("href")?.trim()).ok()?;
            let size = el.value().attr("sizes").map(parse_sizes).unwrap_or(0);
            Some(IconLink { url, size, touch_icon })
        })
        .collect()
}

fn parse_sizes(sizes: &str) -> u32 {
    sizes
        .split_ascii_whitespace()
        .filter_map(|s| {
            let s = s.to_ascii_lowercase();
            let (w, h) = s.split_once('x')?;
            Some(w.parse::<u32>().ok()?.max(h.parse::<u32>().ok()?))
        })
        .max()
        .unwrap_or(0)
}

/// Best icon for a tile of `target` pixels: touch icons first (they are
/// designed for tiles), then the smallest icon at least `target` wide, then
/// the largest available.
pub fn best_icon(links: &[IconLink], target: u32) -> Option<&IconLink> {
    let rank = |l: &IconLink| {
        let fits = l.size >= target;
        // Smaller-but-sufficient beats larger; insufficient ranks by size.
        let size_key = if fits { u32::MAX - l.size } else { l.size };
        (l.touch_icon, fits, size_key)
    };
    links.iter().max_by_key(|l| rank(*l))
}

/// `/favicon.ico` at the site root.
pub fn fallback_icon(page: &Url) -> Option<Url> {
    page.join("/favicon.ico").ok()
}

/// Fetch the page at `page_url` and download the best icon it advertises.
pub fn fetch_thumbnail(page_url: &str, target: u32) -> Result<Thumbnail, IconError> {
    let page = Url::parse(page_url).map_err(|e| IconError::InvalidUrl(format!("{}: {}", page_url, e)))?;
    let client = client()?;

    let response = client
        .get(page.as_str())
        .header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
        .send()
        .map_err(|e| IconError::Request(e.to_string()))?;
    let final_url = response.url().clone();
    let html = response.text().unwrap_or_default();

    let links = icon_links(&html, &final_url);
    let icon_url = best_icon(&links, target)
        .map(|l| l.url.clone())
        .or_else(|| fallback_icon(&final_url))
        .ok_or(IconError::NoIcon)?;
    log::debug!("Icon for {}: {}", page_url, icon_url);

    let response = client
        .get(icon_url.as_str())
        .send()
        .map_err(|e| IconError::Request(e.to_string()))?;
    if !response.status().is_success() {
        return Err(IconError::Status(response.status().as_u16()));
    }
    let bytes = response
        .bytes()
        .map_err(|e| IconError::Request(e.to_string()))?;
    decode_thumbnail(&bytes, target)
}

/// Decode image bytes into an RGBA thumbnail no larger than `target`.
pub fn decode_thumbnail(bytes: &[u8], target: u32) -> Result<Thumbnail, IconError> {
    let img = image::load_from_memory(bytes).map_err(|e| IconError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let (w, h, pixels) = if w > target || h > target {
        let scale = target as f32 / w.max(h) as f32;
        let nw = ((w as f32 * scale) as u32).max(1);
        let nh = ((h as f32 * scale) as u32).max(1);
        let resized = image::imageops::resize(&rgba, nw, nh, image::imageops::FilterType::Triangle);
        (nw, nh, resized.into_raw())
    } else {
        (w, h, rgba.into_raw())
    };

    Ok(Thumbnail {
        width: w,
        height: h,
        rgba: pixels,
    })
}
