//! Search filtering.
//!
//! [`SearchFilter`] narrows a substring search to some collections and
//! optionally caps the number of results.

use crate::document::Collection;

/// Filter criteria for item search.
///
/// Fields set to `None` are not filtered on.
///
/// # Example
///
/// ```rust
/// use tourismdb::{Collection, SearchFilter};
///
/// // Only trails and events, at most 5 hits
/// let filter = SearchFilter {
///     collections: Some(vec![Collection::Trails, Collection::Events]),
///     limit: Some(5),
/// };
/// assert!(filter.includes(Collection::Trails));
/// assert!(!filter.includes(Collection::Community));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Only search these collections. `None` searches all of them.
    ///
    /// Results still follow the pool order (experiences, community, events,
    /// trails) regardless of the order given here.
    pub collections: Option<Vec<Collection>>,

    /// Return at most this many matches.
    pub limit: Option<usize>,
}

impl SearchFilter {
    /// Returns `true` if the given collection should be searched.
    pub fn includes(&self, collection: Collection) -> bool {
        self.collections
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_includes_everything() {
        let filter = SearchFilter::default();
        for collection in Collection::ALL {
            assert!(filter.includes(collection));
        }
        assert_eq!(filter.limit, None);
    }

    #[test]
    fn test_empty_collection_list_includes_nothing() {
        let filter = SearchFilter {
            collections: Some(vec![]),
            ..Default::default()
        };
        for collection in Collection::ALL {
            assert!(!filter.includes(collection));
        }
    }
}
