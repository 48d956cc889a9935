//! Catalog: data model, backend sources, gateway, filtering and facets.

pub mod facets;
pub mod gateway;
pub mod pipeline;
pub mod source;
pub mod types;

// Re-exports for convenience
pub use facets::{extract as extract_facets, FacetSet};
pub use gateway::CatalogGateway;
pub use pipeline::apply;
pub use source::{select_source, ProductSource, SeedSource, SupabaseSource};
pub use types::{FilterConfig, Gender, Product, SortMode, StockFilter};
