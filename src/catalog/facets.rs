//! Facet extraction for the filter controls.
//!
//! Facets are always derived from the full loaded catalog, never from the
//! filtered subset — deselecting a filter must not shrink the available
//! options.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::catalog::types::{Gender, Product};

/// Distinct-value lists used to populate the filter controls.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct FacetSet {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub sizes: Vec<String>,
    pub genders: Vec<Gender>,
}

/// The synthetic "all categories" marker prepended by the gateway;
/// it is a UI affordance, not a real category.
pub const ALL_CATEGORIES_MARKER: &str = "Все";

/// Legacy default category assigned by the admin panel to uncategorized
/// products. Excluded from the facet list like the "all" marker.
const GENERIC_CATEGORY: &str = "general";

/// Derive the facet set from a product collection.
///
/// All four lists are deduplicated. Categories, brands and genders sort with
/// case-insensitive text ordering; sizes sort numerically where both tokens
/// are numeric, with numeric tokens ordered before non-numeric ones.
pub fn extract(products: &[Product]) -> FacetSet {
    let categories = products
        .iter()
        .flat_map(|p| p.categories.iter())
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| !c.eq_ignore_ascii_case(GENERIC_CATEGORY))
        .filter(|c| c.to_lowercase() != ALL_CATEGORIES_MARKER.to_lowercase())
        .map(str::to_string)
        .unique()
        .sorted_by(|a, b| compare_text(a, b))
        .collect();

    let brands = products
        .iter()
        .filter_map(|p| p.brand.as_deref())
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .unique()
        .sorted_by(|a, b| compare_text(a, b))
        .collect();

    let sizes = products
        .iter()
        .flat_map(|p| p.size_tokens())
        .unique()
        .sorted_by(|a, b| compare_sizes(a, b))
        .collect();

    let genders = products
        .iter()
        .filter_map(|p| p.gender)
        .unique()
        .sorted_by(|a, b| compare_text(a.display_name(), b.display_name()))
        .collect();

    FacetSet {
        categories,
        brands,
        sizes,
        genders,
    }
}

/// Case-insensitive text ordering, with the original casing as tie-breaker
/// so the result is total and deterministic.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Size ordering: numeric tokens sort numerically and come before
/// non-numeric tokens; non-numeric tokens fall back to text ordering.
fn compare_sizes(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => compare_text(a, b),
    }
}
