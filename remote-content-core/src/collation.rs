//! Title ordering and filtering.
//!
//! Titles are compared by a collation key: canonical decomposition with
//! combining marks removed, then lowercased. Ties fall back to the raw
//! title so the ordering stays total and deterministic.

use crate::content::ContentItem;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Primary collation key for a title.
pub fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Breaks ties between titles with equal collation keys: lowercase before
/// uppercase, unaccented before accented.
fn tiebreak_key(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_lowercase() {
            key.extend(c.to_uppercase());
        } else {
            key.extend(c.to_lowercase());
        }
    }
    key
}

/// Locale-aware comparison of two titles.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| tiebreak_key(a).cmp(&tiebreak_key(b)))
}

/// Sort items ascending by title.
pub fn sort_by_title(items: &mut [ContentItem]) {
    items.sort_by_cached_key(|item| (collation_key(&item.title), tiebreak_key(&item.title)));
}

/// Keep items whose title contains `needle`, ignoring case and accents.
pub fn filter_by_title(items: Vec<ContentItem>, needle: &str) -> Vec<ContentItem> {
    let needle = collation_key(needle);
    items
        .into_iter()
        .filter(|item| collation_key(&item.title).contains(&needle))
        .collect()
}
