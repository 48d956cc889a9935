//! Filter/search/sort pipeline.
//!
//! A single deterministic pass over the in-memory product set: free-text
//! search, price bounds, stock location, facet constraints, then an optional
//! stable price sort. Pure — the same inputs always produce the same output
//! and the input slice is never mutated. Pass order only matters for
//! efficiency; every pass is an independent predicate.

use crate::catalog::types::{FilterConfig, Product, SortMode, StockFilter};

/// Apply the full filter/search/sort pipeline.
///
/// The relative order of surviving products follows the input order unless a
/// price sort is requested; the sort is stable, so ties keep their pre-sort
/// relative order.
pub fn apply(products: &[Product], query: &str, config: &FilterConfig) -> Vec<Product> {
    let query = query.trim().to_lowercase();
    let price_from = parse_bound(config.price_from.as_deref());
    let price_to = parse_bound(config.price_to.as_deref());

    let selected_categories: Vec<String> = config
        .selected_categories
        .iter()
        .map(|c| c.to_lowercase())
        .collect();

    let mut filtered: Vec<Product> = products
        .iter()
        .filter(|p| matches_query(p, &query))
        .filter(|p| price_from.map_or(true, |min| p.price >= min))
        .filter(|p| price_to.map_or(true, |max| p.price <= max))
        .filter(|p| matches_stock(p, config.stock_location))
        .filter(|p| matches_categories(p, &selected_categories))
        .filter(|p| matches_brands(p, &config.selected_brands))
        .filter(|p| matches_sizes(p, &config.selected_sizes))
        .filter(|p| matches_genders(p, config))
        .cloned()
        .collect();

    match config.sort {
        SortMode::None => {}
        SortMode::PriceAsc => filtered.sort_by_key(|p| p.price),
        SortMode::PriceDesc => filtered.sort_by_key(|p| std::cmp::Reverse(p.price)),
    }

    filtered
}

/// Non-numeric bounds are ignored, not errors
fn parse_bound(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

/// Case-insensitive substring match against name, description and tags.
/// An empty query matches everything; a missing field simply contributes
/// no match.
fn matches_query(product: &Product, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(query)
        || product.description.to_lowercase().contains(query)
        || product.tags.iter().any(|t| t.to_lowercase().contains(query))
}

fn matches_stock(product: &Product, filter: StockFilter) -> bool {
    match filter {
        StockFilter::Any => true,
        StockFilter::Domestic => product.stock_domestic > 0,
        StockFilter::Overseas => product.stock_overseas > 0,
        StockFilter::Both => product.stock_domestic > 0 && product.stock_overseas > 0,
    }
}

/// Category intersection, case-insensitive. A product with no categories
/// never matches a non-empty constraint.
fn matches_categories(product: &Product, selected_lower: &[String]) -> bool {
    if selected_lower.is_empty() {
        return true;
    }
    product
        .categories
        .iter()
        .any(|c| selected_lower.iter().any(|s| s == &c.to_lowercase()))
}

/// Brand membership is exact (case-sensitive), matching the filter chips
/// which are populated from the products themselves.
fn matches_brands(product: &Product, selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    match &product.brand {
        Some(brand) => selected.iter().any(|s| s == brand),
        None => false,
    }
}

fn matches_sizes(product: &Product, selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    let tokens = product.size_tokens();
    if tokens.is_empty() {
        return false;
    }
    tokens.iter().any(|t| selected.iter().any(|s| s == t))
}

fn matches_genders(product: &Product, config: &FilterConfig) -> bool {
    if config.selected_genders.is_empty() {
        return true;
    }
    match product.gender {
        Some(gender) => config.selected_genders.contains(&gender),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::Gender;
    use pretty_assertions::assert_eq;

    fn product(id: i64, price: u64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: String::new(),
            price,
            categories: Vec::new(),
            brand: None,
            gender: None,
            sizes: Vec::new(),
            colors: Vec::new(),
            tags: Vec::new(),
            stock_domestic: 1,
            stock_overseas: 1,
            photos: Vec::new(),
            marketplace_links: Vec::new(),
            is_active: true,
        }
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_identity_pass_preserves_order() {
        let products = vec![product(3, 30), product(1, 10), product(2, 20)];
        let result = apply(&products, "", &FilterConfig::default());
        assert_eq!(result, products);
    }

    #[test]
    fn test_query_matches_name_description_and_tags() {
        let mut a = product(1, 100);
        a.name = "Беспроводные наушники".to_string();
        let mut b = product(2, 100);
        b.description = "кабель быстрой зарядки".to_string();
        let mut c = product(3, 100);
        c.tags = vec!["наушники".to_string()];
        let d = product(4, 100);

        let products = vec![a, b, c, d];
        assert_eq!(ids(&apply(&products, "НАУШНИКИ", &FilterConfig::default())), vec![1, 3]);
        assert_eq!(ids(&apply(&products, "кабель", &FilterConfig::default())), vec![2]);
        // whitespace-only query matches everything
        assert_eq!(apply(&products, "   ", &FilterConfig::default()).len(), 4);
    }

    #[test]
    fn test_price_bounds() {
        let products = vec![product(1, 100), product(2, 500), product(3, 1000)];
        let config = FilterConfig {
            price_from: Some("200".to_string()),
            price_to: Some("999".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &config)), vec![2]);
    }

    #[test]
    fn test_non_numeric_price_bounds_are_ignored() {
        let products = vec![product(1, 100), product(2, 500)];
        let config = FilterConfig {
            price_from: Some("abc".to_string()),
            price_to: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(apply(&products, "", &config).len(), 2);
    }

    #[test]
    fn test_stock_location_constraints() {
        let mut rf_only = product(1, 100);
        rf_only.stock_overseas = 0;
        let mut china_only = product(2, 100);
        china_only.stock_domestic = 0;
        let both = product(3, 100);
        let products = vec![rf_only, china_only, both];

        let mut config = FilterConfig {
            stock_location: StockFilter::Domestic,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &config)), vec![1, 3]);

        config.stock_location = StockFilter::Overseas;
        assert_eq!(ids(&apply(&products, "", &config)), vec![2, 3]);

        config.stock_location = StockFilter::Both;
        assert_eq!(ids(&apply(&products, "", &config)), vec![3]);
    }

    #[test]
    fn test_category_constraint_is_case_insensitive() {
        let mut a = product(1, 100);
        a.categories = vec!["Обувь".to_string()];
        let mut b = product(2, 50);
        b.categories = vec!["Одежда".to_string()];
        let products = vec![a, b];

        let config = FilterConfig {
            selected_categories: vec!["обувь".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &config)), vec![1]);
    }

    #[test]
    fn test_empty_category_list_never_matches_constraint() {
        let no_cats = product(1, 100);
        let config = FilterConfig {
            selected_categories: vec!["a".to_string()],
            ..Default::default()
        };
        assert!(apply(&[no_cats], "", &config).is_empty());
    }

    #[test]
    fn test_single_category_selection() {
        let mut a = product(1, 100);
        a.categories = vec!["a".to_string()];
        let mut b = product(2, 50);
        b.categories = vec!["b".to_string()];
        let products = vec![a, b];

        let config = FilterConfig {
            selected_categories: vec!["a".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &config)), vec![1]);
    }

    #[test]
    fn test_cheapest_first_sort() {
        let products = vec![product(1, 100), product(2, 50)];
        let config = FilterConfig {
            sort: SortMode::PriceAsc,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &config)), vec![2, 1]);
    }

    #[test]
    fn test_price_sort_is_stable_on_ties() {
        let products = vec![product(1, 100), product(2, 100), product(3, 50)];

        let asc = FilterConfig {
            sort: SortMode::PriceAsc,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &asc)), vec![3, 1, 2]);

        let desc = FilterConfig {
            sort: SortMode::PriceDesc,
            ..Default::default()
        };
        // ties keep pre-sort relative order even descending
        assert_eq!(ids(&apply(&products, "", &desc)), vec![1, 2, 3]);
    }

    #[test]
    fn test_brand_constraint_is_case_sensitive() {
        let mut a = product(1, 100);
        a.brand = Some("Nike".to_string());
        let mut b = product(2, 100);
        b.brand = Some("nike".to_string());
        let c = product(3, 100);
        let products = vec![a, b, c];

        let config = FilterConfig {
            selected_brands: vec!["Nike".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &config)), vec![1]);
    }

    #[test]
    fn test_size_constraint_uses_normalized_tokens() {
        let mut a = product(1, 100);
        a.sizes = vec![" 42 ".to_string()];
        let mut b = product(2, 100);
        b.sizes = vec!["41".to_string()];
        let products = vec![a, b];

        let config = FilterConfig {
            selected_sizes: vec!["42".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &config)), vec![1]);
    }

    #[test]
    fn test_gender_constraint() {
        let mut a = product(1, 100);
        a.gender = Some(Gender::Male);
        let b = product(2, 100);
        let products = vec![a, b];

        let config = FilterConfig {
            selected_genders: vec![Gender::Male],
            ..Default::default()
        };
        assert_eq!(ids(&apply(&products, "", &config)), vec![1]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let products = vec![product(1, 100), product(2, 50)];
        let before = products.clone();
        let config = FilterConfig {
            sort: SortMode::PriceAsc,
            ..Default::default()
        };
        let _ = apply(&products, "", &config);
        assert_eq!(products, before);
    }
}
