//! Catalog data gateway.
//!
//! The one place the rest of the application gets products from. Fetches
//! from the configured [`ProductSource`], resolves every product's photo
//! references through the [`PhotoResolver`] with bounded concurrency, and
//! never lets a backend failure escape: callers always receive a usable
//! (possibly empty) result.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;

use crate::catalog::source::ProductSource;
use crate::catalog::types::Product;
use crate::core::config;
use crate::telegram::PhotoResolver;

/// Read facade over the product backend.
pub struct CatalogGateway {
    source: Box<dyn ProductSource>,
    resolver: Arc<PhotoResolver>,
    /// Shuffle the product list on load, like the storefront landing page
    /// does. Off by default so tests and the API stay deterministic.
    shuffle: bool,
}

impl CatalogGateway {
    pub fn new(source: Box<dyn ProductSource>, resolver: Arc<PhotoResolver>) -> Self {
        Self {
            source,
            resolver,
            shuffle: false,
        }
    }

    /// Enable the landing-page shuffle.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn resolver(&self) -> &Arc<PhotoResolver> {
        &self.resolver
    }

    /// All active products with displayable photo URLs, optionally narrowed
    /// to one category at the backend.
    ///
    /// Backend failures degrade to an empty list (logged, never thrown); run
    /// with `CATALOG_SOURCE=seed` to get the fixed development set instead.
    pub async fn list_products(&self, category: Option<&str>) -> Vec<Product> {
        // The "Все" chip is the synthetic marker this gateway prepends in
        // list_categories; it means "no constraint", not a real category
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != crate::catalog::facets::ALL_CATEGORIES_MARKER);

        let products = match self.source.fetch_products(category).await {
            Ok(products) => products,
            Err(e) => {
                log::error!("Failed to fetch products: {}", e);
                return Vec::new();
            }
        };

        let mut products = self.resolve_photos(products).await;

        if self.shuffle {
            use rand::seq::SliceRandom;
            products.shuffle(&mut rand::thread_rng());
        }

        products
    }

    /// One product by id, photos resolved. `None` on not-found or any
    /// backend failure.
    pub async fn get_product(&self, id: i64) -> Option<Product> {
        let product = match self.source.fetch_product(id).await {
            Ok(found) => found?,
            Err(e) => {
                log::error!("Failed to fetch product {}: {}", id, e);
                return None;
            }
        };

        if !product.is_active {
            return None;
        }

        let mut product = product;
        product.photos = self.resolver.resolve_all(&product.photos).await;
        Some(product)
    }

    /// Backend substring search over name/description, photos resolved.
    pub async fn search_products(&self, query: &str) -> Vec<Product> {
        match self.source.search_products(query).await {
            Ok(products) => self.resolve_photos(products).await,
            Err(e) => {
                log::error!("Product search failed for {:?}: {}", query, e);
                Vec::new()
            }
        }
    }

    /// Category names for the filter controls, with the synthetic "Все"
    /// marker prepended.
    ///
    /// An empty backend category list falls back to scanning all products'
    /// category memberships; a backend error degrades to just the marker.
    pub async fn list_categories(&self) -> Vec<String> {
        let mut categories = match self.source.fetch_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                log::error!("Failed to fetch categories: {}", e);
                Vec::new()
            }
        };

        if categories.is_empty() {
            categories = match self.source.fetch_products(None).await {
                Ok(products) => {
                    let mut seen = Vec::new();
                    for p in &products {
                        for c in &p.categories {
                            let c = c.trim();
                            if !c.is_empty() && !seen.iter().any(|s: &String| s == c) {
                                seen.push(c.to_string());
                            }
                        }
                    }
                    seen.sort_by_key(|c| c.to_lowercase());
                    seen
                }
                Err(_) => Vec::new(),
            };
        }

        let mut result = Vec::with_capacity(categories.len() + 1);
        result.push(crate::catalog::facets::ALL_CATEGORIES_MARKER.to_string());
        result.extend(categories);
        result
    }

    /// Resolve photo references for a batch of products.
    ///
    /// Runs up to `MAX_CONCURRENT_RESOLUTIONS` products in parallel so large
    /// catalogs do not serialize one photo lookup at a time. Results are
    /// written back by product index, so completion order does not matter.
    /// Each product's own photo order is preserved.
    async fn resolve_photos(&self, mut products: Vec<Product>) -> Vec<Product> {
        // Inactive rows must never leave the gateway, whatever the source did
        products.retain(|p| p.is_active);

        let semaphore = Arc::new(Semaphore::new(config::photos::MAX_CONCURRENT_RESOLUTIONS));

        let tasks: Vec<_> = products
            .iter()
            .enumerate()
            .map(|(idx, product)| {
                let refs = product.photos.clone();
                let resolver = Arc::clone(&self.resolver);
                let semaphore = Arc::clone(&semaphore);
                async move {
                    // The semaphore is never closed, but fall through with
                    // unresolved refs rather than panic if acquire fails
                    let _permit = semaphore.acquire().await;
                    (idx, resolver.resolve_all(&refs).await)
                }
            })
            .collect();

        let results = join_all(tasks).await;
        for (idx, photos) in results {
            products[idx].photos = photos;
        }

        products
    }
}
