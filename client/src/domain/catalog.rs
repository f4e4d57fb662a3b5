//! Client-side catalog refinement.
//!
//! The catalog view fetches one page of terms at a time and refines it in
//! memory: a category predicate, a case-insensitive substring filter, and a
//! sort switch. The refinement is recomputed from scratch on every state
//! change rather than maintained incrementally; pages are small (20 items)
//! and the comparator is cheap.

use serde::{Deserialize, Serialize};

use super::model::Term;

/// Comparator applied to the fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// View count, descending.
    #[default]
    Usage,
    /// Title, case-insensitive ascending.
    #[serde(rename = "alpha")]
    Alphabetical,
}

/// In-memory refinement applied after each fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    /// Keep only terms in this category.
    pub category_id: Option<i64>,
    /// Keep only terms whose title or short definition contains this text.
    pub query: Option<String>,
    /// Ordering of the surviving terms.
    pub sort: SortOrder,
}

impl CatalogFilter {
    /// Filter for a single category with default ordering.
    #[must_use]
    pub fn for_category(category_id: i64) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }
}

/// Apply the filter and sort to a fetched page of terms.
///
/// # Examples
/// ```
/// use sozdik::domain::catalog::{refine, CatalogFilter, SortOrder};
///
/// let filter = CatalogFilter { sort: SortOrder::Usage, ..Default::default() };
/// let refined = refine(&[], &filter);
/// assert!(refined.is_empty());
/// ```
#[must_use]
pub fn refine(terms: &[Term], filter: &CatalogFilter) -> Vec<Term> {
    let needle = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_lowercase);

    let mut refined: Vec<Term> = terms
        .iter()
        .filter(|term| {
            filter
                .category_id
                .is_none_or(|category_id| term.category_id == category_id)
        })
        .filter(|term| {
            needle.as_deref().is_none_or(|needle| {
                term.title.to_lowercase().contains(needle)
                    || term
                        .short_definition
                        .as_deref()
                        .is_some_and(|text| text.to_lowercase().contains(needle))
            })
        })
        .cloned()
        .collect();

    match filter.sort {
        SortOrder::Usage => refined.sort_by(|a, b| b.views.cmp(&a.views)),
        SortOrder::Alphabetical => refined.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
        }),
    }
    refined
}
