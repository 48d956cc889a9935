//! Mini App web server.
//!
//! JSON API consumed by the storefront shell (standalone web page or
//! Telegram Mini App). The shell owns routing, theming and haptics; this
//! layer only hands it catalog data. Every endpoint degrades the way the
//! gateway does — a broken backend yields empty lists and the shell shows
//! its generic "could not load catalog" notice, never a 5xx loop.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::{self, CatalogGateway, FacetSet, FilterConfig, Product, SortMode, StockFilter};

// ============================================================================
// API DATA STRUCTURES
// ============================================================================

/// Query parameters of GET /api/products.
///
/// Multi-select facets arrive comma-separated; price bounds arrive as the
/// raw text of the inputs (the pipeline ignores non-numeric values).
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Free-text search
    #[serde(default)]
    pub q: Option<String>,
    /// Backend-side single-category narrowing
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price_from: Option<String>,
    #[serde(default)]
    pub price_to: Option<String>,
    /// all | rf | china | both
    #[serde(default)]
    pub stock: Option<String>,
    /// none | priceAsc | priceDesc
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub brands: Option<String>,
    #[serde(default)]
    pub sizes: Option<String>,
    #[serde(default)]
    pub genders: Option<String>,
}

impl ProductsQuery {
    /// Build the pipeline filter snapshot. Unknown stock/sort/gender tokens
    /// are treated as no-op constraints, not validation errors.
    fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            price_from: self.price_from.clone(),
            price_to: self.price_to.clone(),
            stock_location: self
                .stock
                .as_deref()
                .and_then(|s| StockFilter::from_str(s).ok())
                .unwrap_or_default(),
            sort: self
                .sort
                .as_deref()
                .and_then(|s| SortMode::from_str(s).ok())
                .unwrap_or_default(),
            selected_categories: split_csv(self.categories.as_deref()),
            selected_brands: split_csv(self.brands.as_deref()),
            selected_sizes: split_csv(self.sizes.as_deref()),
            selected_genders: split_csv(self.genders.as_deref())
                .iter()
                .filter_map(|g| g.parse().ok())
                .collect(),
        }
    }
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Response of GET /api/products
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    /// Size of the full loaded catalog, before filtering
    pub total: usize,
    /// Facets of the full catalog (never of the filtered subset)
    pub facets: FacetSet,
}

/// Response of GET /api/categories
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Static shop info for the about page
#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub name: &'static str,
    pub description: &'static str,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Shared state for all endpoints
#[derive(Clone)]
pub struct WebAppState {
    pub gateway: Arc<CatalogGateway>,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the Mini App API router.
pub fn create_router(gateway: Arc<CatalogGateway>) -> Router {
    let state = WebAppState { gateway };

    // The Mini App is served from a different origin (Telegram WebView /
    // static hosting), so the API must allow cross-origin reads
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/products", get(handle_products))
        .route("/api/products/:id", get(handle_product))
        .route("/api/categories", get(handle_categories))
        .route("/api/facets", get(handle_facets))
        .route("/api/about", get(handle_about))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Run the Mini App web server.
pub async fn run_webapp_server(port: u16, gateway: Arc<CatalogGateway>) -> anyhow::Result<()> {
    let app = create_router(gateway);

    let addr = format!("0.0.0.0:{}", port);
    log::info!("🌐 Starting catalog web server on http://{}", addr);
    log::info!("  /api/products      - filtered product list");
    log::info!("  /api/products/:id  - product detail");
    log::info!("  /api/categories    - category list");
    log::info!("  /api/facets        - filter facets");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// API HANDLERS
// ============================================================================

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "averon-catalog"
    }))
}

/// GET /api/products - the visible subset plus full-catalog facets
async fn handle_products(
    State(state): State<Arc<WebAppState>>,
    Query(query): Query<ProductsQuery>,
) -> Json<ProductsResponse> {
    let products = state.gateway.list_products(query.category.as_deref()).await;

    let facets = catalog::extract_facets(&products);
    let visible = catalog::apply(&products, query.q.as_deref().unwrap_or(""), &query.filter_config());

    Json(ProductsResponse {
        total: products.len(),
        products: visible,
        facets,
    })
}

/// GET /api/products/:id - product detail
async fn handle_product(
    State(state): State<Arc<WebAppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    state
        .gateway
        .get_product(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", id)))
}

/// GET /api/categories - category names with the "Все" marker first
async fn handle_categories(State(state): State<Arc<WebAppState>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.gateway.list_categories().await,
    })
}

/// GET /api/facets - facets of the full loaded catalog
async fn handle_facets(State(state): State<Arc<WebAppState>>) -> Json<FacetSet> {
    let products = state.gateway.list_products(None).await;
    Json(catalog::extract_facets(&products))
}

/// GET /api/about - static shop info
async fn handle_about() -> Json<AboutResponse> {
    Json(AboutResponse {
        name: "AVERON SHOP",
        description: "Каталог товаров Averon: электроника, аксессуары, одежда и обувь. \
                      Доставка со складов в РФ и Китае.",
    })
}
