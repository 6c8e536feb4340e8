//! Display-time search and ordering of winner lists.

use cekilis_types::Winner;

use crate::collation::{compare, search_fold};

/// Keep the winners matching `query`, sorted by handle.
///
/// A winner matches when the case-folded query is a substring of its
/// handle, full name, phone, address or notes. `I`, `ı`, `İ` and `i` all
/// match each other. A blank query keeps
/// everyone. The result is ordered by handle in Turkish alphabetical
/// order. Nothing is written back to the store.
pub fn filter_and_sort(winners: Vec<Winner>, query: &str) -> Vec<Winner> {
    let needle = search_fold(query.trim());

    let mut matched: Vec<Winner> = if needle.is_empty() {
        winners
    } else {
        winners
            .into_iter()
            .filter(|winner| matches(winner, &needle))
            .collect()
    };
    matched.sort_by(|a, b| compare(&a.handle, &b.handle));
    matched
}

fn matches(winner: &Winner, needle: &str) -> bool {
    [
        Some(winner.handle.as_str()),
        Some(winner.full_name.as_str()),
        Some(winner.phone.as_str()),
        Some(winner.address.as_str()),
        winner.notes.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| search_fold(field).contains(needle))
}
