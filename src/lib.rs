//! Averon Catalog - product-catalog service for the Averon storefront
//!
//! This library provides the core functionality behind the storefront's
//! standalone web page and Telegram Mini App: the catalog data gateway,
//! Telegram photo resolution, the filter/search/sort pipeline, facet
//! extraction, the carousel interaction model and bulk photo preloading.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging
//! - `catalog`: Data model, backend sources, gateway, pipeline and facets
//! - `telegram`: Photo resolution via the Bot API
//! - `carousel`: Image carousel state machine
//! - `preload`: Bounded-concurrency photo preloading
//! - `webapp`: Mini App JSON API (axum)

pub mod carousel;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod preload;
pub mod telegram;
pub mod webapp;

// Re-export commonly used types for convenience
pub use carousel::Carousel;
pub use catalog::{CatalogGateway, FacetSet, FilterConfig, Product};
pub use core::{config, AppError, AppResult};
pub use telegram::PhotoResolver;
