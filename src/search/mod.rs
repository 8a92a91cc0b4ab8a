//! Search operations for TourismDB.
//!
//! Case-insensitive substring search over item `title`, `name`, `role` and
//! `type` fields. The candidate pool is experiences, community, events and
//! trails, in that order; results keep pool order.

mod filter;

pub use filter::SearchFilter;

use crate::document::{Collection, Document, Item};

/// Returns every item whose searchable fields contain `query`, ignoring case.
///
/// Missing fields count as empty strings. An empty query matches every item.
pub fn search(doc: &Document, query: &str) -> Vec<Item> {
    search_filtered(doc, query, &SearchFilter::default())
}

/// Like [`search`], restricted by a [`SearchFilter`].
pub fn search_filtered(doc: &Document, query: &str, filter: &SearchFilter) -> Vec<Item> {
    let needle = query.to_lowercase();
    let limit = filter.limit.unwrap_or(usize::MAX);

    Collection::ALL
        .into_iter()
        .filter(|c| filter.includes(*c))
        .flat_map(|c| doc.items(c))
        .filter(|item| matches_query(item, &needle))
        .take(limit)
        .cloned()
        .collect()
}

/// `needle` must already be lowercased.
fn matches_query(item: &Item, needle: &str) -> bool {
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
