//! Listing presentation: search, extension filter and ordering
//!
//! Everything here is pure. Filtering keeps the relative order of keys and
//! every ordering is a stable sort, so filtering and sorting commute.

use crate::SortOrder;
use std::cmp::Ordering;

/// Extensions shown as images
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "avif", "ico", "tif", "tiff",
];

/// Lowercased suffix after the last period, if any
pub fn file_extension(key: &str) -> Option<String> {
    let (_, ext) = key.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Case-insensitive substring match; an empty term matches everything
pub fn matches_search(key: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || key.to_lowercase().contains(&term.to_lowercase())
}

/// Exact extension match, ignoring case and a leading period
pub fn matches_extension(key: &str, extension: &str) -> bool {
    let wanted = extension.trim().trim_start_matches('.').to_lowercase();
    if wanted.is_empty() {
        return true;
    }
    file_extension(key).is_some_and(|ext| ext == wanted)
}

/// Whether a key should be previewed as an image
pub fn is_image(key: &str) -> bool {
    file_extension(key).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn compare(order: SortOrder, a: &str, b: &str) -> Ordering {
    match order {
        SortOrder::Original => Ordering::Equal,
        SortOrder::NameAsc => a.cmp(b),
        SortOrder::NameDesc => b.cmp(a),
        SortOrder::ExtensionAsc => file_extension(a)
            .cmp(&file_extension(b))
            .then_with(|| a.cmp(b)),
    }
}

/// Stable sort of keys in the given order
pub fn sort_keys(keys: &mut [String], order: SortOrder) {
    if order != SortOrder::Original {
        keys.sort_by(|a, b| compare(order, a, b));
    }
}

/// Client-side view over the last fetched listing
#[derive(Clone, Debug, Default)]
pub struct GalleryView {
    keys: Vec<String>,
    search: String,
    extension: Option<String>,
    sort: SortOrder,
}

impl GalleryView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the listing with a freshly fetched one
    pub fn set_keys(&mut self, keys: Vec<String>) {
        self.keys = keys;
    }

    /// Keys as fetched, unfiltered
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Set the search term
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Current search term
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Restrict to one extension, or clear with `None`
    pub fn set_extension(&mut self, extension: Option<String>) {
        self.extension = extension;
    }

    /// Current extension filter
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Set the display order
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Current display order
    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Keys to display, filtered then ordered
    pub fn visible(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .keys
            .iter()
            .filter(|key| self.matches(key))
            .cloned()
            .collect();
        sort_keys(&mut keys, self.sort);
        keys
    }

    /// Distinct extensions in the listing, for the filter choices
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> =
            self.keys.iter().filter_map(|k| file_extension(k)).collect();
        extensions.sort();
        extensions.dedup();
        extensions
    }

    fn matches(&self, key: &str) -> bool {
        matches_search(key, &self.search)
            && self
                .extension
                .as_deref()
                .map_or(true, |ext| matches_extension(key, ext))
    }
}
