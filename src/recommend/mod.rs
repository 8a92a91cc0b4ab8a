//! Popularity-based recommendations.
//!
//! This is a global-popularity heuristic, not personalized filtering: every
//! user sees the same ranking, minus what they already booked.
//!
//! # Algorithm
//!
//! ```text
//! pool       = experiences ++ events ++ trails          (source order)
//! popularity = bookings per item id, across all users
//! keep       = items with a non-zero id, not booked by the user
//! rank       = stable sort by popularity, descending
//! result     = first `limit`
//! ```

use std::collections::{HashMap, HashSet};

use crate::document::{Booking, Document, Item};
use crate::types::{ItemId, UserId};

/// Counts bookings per item id across all users.
///
/// Bookings without an item id are ignored.
pub fn popularity(doc: &Document) -> HashMap<ItemId, usize> {
    let mut counts = HashMap::new();
    for item_id in doc.bookings.iter().filter_map(Booking::item) {
        *counts.entry(item_id).or_insert(0) += 1;
    }
    counts
}

/// Recommends up to `limit` items for `user_id`, most booked first.
///
/// Items with equal popularity keep their pool order, so the output is
/// deterministic. A user without bookings gets the globally most popular
/// items; unbooked items (popularity 0) still qualify, after booked ones.
pub fn recommend(doc: &Document, user_id: UserId, limit: usize) -> Vec<Item> {
    let counts = popularity(doc);
    let booked_by_user: HashSet<ItemId> = doc
        .bookings
        .iter()
        .filter(|b| b.is_by(&user_id))
        .filter_map(Booking::item)
        .collect();

    let mut candidates: Vec<(usize, &Item)> = doc
        .experiences
        .iter()
        .chain(&doc.events)
        .chain(&doc.trails)
        .filter_map(|item| {
            let id = item.truthy_id()?;
            if booked_by_user.contains(&id) {
                return None;
            }
            Some((counts.get(&id).copied().unwrap_or(0), item))
        })
        .collect();

    // sort_by is stable: ties keep pool order
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    candidates
        .into_iter()
        .take(limit)
        .map(|(_, item)| item.clone())
        .collect()
}
