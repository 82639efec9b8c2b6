use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ArticleRoute;

/// One cached article as reported by the backend's cache listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheEntry {
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub modified: DateTime<Utc>,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRowView {
    pub title: String,
    pub modified: String,
    pub size: String,
    /// `None` when the entry's language/name do not form a valid article route.
    pub view_href: Option<String>,
    pub download_href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheListingView {
    pub rows: Vec<CacheRowView>,
    /// Entries in the whole cache, including rows cut by [`CacheListingView::newest`].
    pub total_count: usize,
    pub total_size: String,
}

/// How many articles the "recent articles" list shows.
pub const RECENT_ARTICLES: usize = 10;

impl CacheListingView {
    /// Keeps the `limit` newest rows. Totals still describe the whole cache.
    pub fn newest(mut self, limit: usize) -> Self {
        self.rows.truncate(limit);
        self
    }
}

impl CacheEntry {
    pub fn route(&self) -> Option<ArticleRoute> {
        ArticleRoute::new(self.language.clone(), self.name.clone())
    }
}

/// Newest first, with human-readable sizes and timestamps.
pub fn cache_listing_view(entries: &[CacheEntry]) -> CacheListingView {
    let mut sorted: Vec<&CacheEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));

    let rows = sorted
        .into_iter()
        .map(|entry| {
            let route = entry.route();
            CacheRowView {
                title: entry
                    .title
                    .clone()
                    .unwrap_or_else(|| entry.name.replace('_', " ")),
                modified: entry.modified.format("%Y-%m-%d %H:%M").to_string(),
                size: format_size(entry.size_bytes),
                view_href: route.as_ref().map(ArticleRoute::path),
                download_href: route.as_ref().map(ArticleRoute::download_path),
            }
        })
        .collect();

    CacheListingView {
        rows,
        total_count: entries.len(),
        total_size: format_size(entries.iter().map(|e| e.size_bytes).sum()),
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < MB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{:.1} MB", value / MB)
    }
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn sizes_pick_a_unit() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
