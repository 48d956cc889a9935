//! Backend product sources.
//!
//! The gateway talks to a [`ProductSource`] trait object so the data origin
//! is a deployment decision: `SupabaseSource` reads the hosted PostgREST
//! endpoint in production, `SeedSource` serves a fixed in-memory set for
//! development and tests. Selection happens once at startup from
//! `CATALOG_SOURCE` (see [`select_source`]).
//!
//! Sources return already-normalized [`Product`] values — this is the one
//! place raw backend rows exist.

use async_trait::async_trait;

use crate::catalog::types::{MarketplaceLink, Product, ProductRow};
use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Read-only view of the product backend.
///
/// Every operation only ever sees active products; inactive rows are
/// filtered at the query level and must not leak past this trait.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// All active products, newest first, optionally narrowed to one category.
    async fn fetch_products(&self, category: Option<&str>) -> AppResult<Vec<Product>>;

    /// One active product by id, `None` when absent or inactive.
    async fn fetch_product(&self, id: i64) -> AppResult<Option<Product>>;

    /// Active products whose name or description contains the query.
    async fn search_products(&self, query: &str) -> AppResult<Vec<Product>>;

    /// Active category names, alphabetical.
    async fn fetch_categories(&self) -> AppResult<Vec<String>>;
}

/// Hosted backend over PostgREST.
pub struct SupabaseSource {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

/// Row of the categories table; only the name survives normalization.
#[derive(Debug, serde::Deserialize)]
struct CategoryRow {
    name: Option<String>,
}

impl SupabaseSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Build from the environment configuration.
    pub fn from_env(client: reqwest::Client) -> Self {
        Self::new(client, config::SUPABASE_URL.as_str(), config::SUPABASE_ANON_KEY.as_str())
    }

    async fn get_rows<T: serde::de::DeserializeOwned>(&self, path_and_query: &str) -> AppResult<Vec<T>> {
        let url = format!("{}/rest/v1/{}", self.base_url, path_and_query);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus(status));
        }

        Ok(response.json().await?)
    }

    async fn get_products(&self, path_and_query: &str) -> AppResult<Vec<Product>> {
        let rows: Vec<ProductRow> = self.get_rows(path_and_query).await?;
        Ok(rows.into_iter().map(ProductRow::normalize).collect())
    }
}

#[async_trait]
impl ProductSource for SupabaseSource {
    async fn fetch_products(&self, category: Option<&str>) -> AppResult<Vec<Product>> {
        let query = match category {
            Some(cat) => format!(
                "products?select=*&is_active=eq.true&category=eq.{}&order=created_at.desc",
                urlencode(cat)
            ),
            None => "products?select=*&is_active=eq.true&order=created_at.desc".to_string(),
        };
        self.get_products(&query).await
    }

    async fn fetch_product(&self, id: i64) -> AppResult<Option<Product>> {
        let query = format!("products?select=*&is_active=eq.true&id=eq.{}&limit=1", id);
        Ok(self.get_products(&query).await?.into_iter().next())
    }

    async fn search_products(&self, query: &str) -> AppResult<Vec<Product>> {
        let q = urlencode(query);
        let path = format!(
            "products?select=*&is_active=eq.true&or=(name.ilike.*{}*,description.ilike.*{}*)&order=created_at.desc",
            q, q
        );
        self.get_products(&path).await
    }

    async fn fetch_categories(&self) -> AppResult<Vec<String>> {
        let rows: Vec<CategoryRow> =
            self.get_rows("categories?select=name&is_active=eq.true&order=name.asc").await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect())
    }
}

/// Minimal percent-encoding for values embedded in PostgREST query strings.
fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Fixed development product set.
///
/// Mirrors what the shop actually sold when the catalog was first built, so
/// the UI has something realistic to render when Supabase is unreachable or
/// unconfigured.
pub struct SeedSource;

impl SeedSource {
    pub fn products() -> Vec<Product> {
        let mk = |id: i64, name: &str, price: u64, description: &str, category: &str, tags: &[&str], stock_rf: u32, stock_china: u32, avito: &str| Product {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price,
            categories: vec![category.to_string()],
            brand: Some("Generic".to_string()),
            gender: None,
            sizes: Vec::new(),
            colors: vec!["Черный".to_string()],
            tags: tags.iter().map(|t| t.to_string()).collect(),
            stock_domestic: stock_rf,
            stock_overseas: stock_china,
            photos: vec![format!(
                "https://via.placeholder.com/400x400/007acc/ffffff?text=Товар+{}",
                id
            )],
            marketplace_links: vec![MarketplaceLink {
                marketplace: "avito".to_string(),
                url: avito.to_string(),
            }],
            is_active: true,
        };

        vec![
            mk(
                1,
                "Беспроводные наушники TWS Pro 3",
                4500,
                "Высококачественные беспроводные наушники с активным шумоподавлением. \
                 Время работы до 30 часов с кейсом. Быстрая зарядка и защита от влаги IPX7.",
                "electronics",
                &["наушники", "беспроводные", "tws"],
                5,
                12,
                "https://avito.ru/example1",
            ),
            mk(
                2,
                "Премиальный кабель быстрой зарядки 6A, 120 Вт (1.8 метра)",
                899,
                "Сверхбыстрый кабель зарядки с поддержкой мощности до 120Вт. \
                 Совместим с большинством современных устройств. Прочная нейлоновая оплетка.",
                "accessories",
                &["кабель", "зарядка", "120w"],
                15,
                25,
                "https://avito.ru/example2",
            ),
            mk(
                3,
                "Премиальный кабель быстрой зарядки 6A, 120 Вт (1 метр)",
                799,
                "Компактный кабель быстрой зарядки 120Вт длиной 1 метр. \
                 Идеален для повседневного использования. Высокое качество материалов.",
                "accessories",
                &["кабель", "зарядка", "120w"],
                10,
                30,
                "https://avito.ru/example3",
            ),
            mk(
                4,
                "Премиальный кабель быстрой зарядки 6A, 120 Вт (2 метра)",
                999,
                "Удлиненный кабель быстрой зарядки 120Вт длиной 2 метра. \
                 Больше свободы во время зарядки. Усиленные коннекторы.",
                "accessories",
                &["кабель", "зарядка", "120w"],
                8,
                20,
                "https://avito.ru/example4",
            ),
        ]
    }
}

#[async_trait]
impl ProductSource for SeedSource {
    async fn fetch_products(&self, category: Option<&str>) -> AppResult<Vec<Product>> {
        let products = Self::products();
        Ok(match category {
            Some(cat) => products
                .into_iter()
                .filter(|p| p.categories.iter().any(|c| c.eq_ignore_ascii_case(cat)))
                .collect(),
            None => products,
        })
    }

    async fn fetch_product(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(Self::products().into_iter().find(|p| p.id == id))
    }

    async fn search_products(&self, query: &str) -> AppResult<Vec<Product>> {
        let q = query.to_lowercase();
        Ok(Self::products()
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&q) || p.description.to_lowercase().contains(&q))
            .collect())
    }

    async fn fetch_categories(&self) -> AppResult<Vec<String>> {
        Ok(vec!["accessories".to_string(), "electronics".to_string()])
    }
}

/// Pick the product source from `CATALOG_SOURCE`.
///
/// "seed" selects the fixed set; anything else (including unknown values,
/// which are logged at startup) selects the live Supabase backend.
pub fn select_source(client: reqwest::Client) -> Box<dyn ProductSource> {
    match config::CATALOG_SOURCE.as_str() {
        "seed" => Box::new(SeedSource),
        _ => Box::new(SupabaseSource::from_env(client)),
    }
}
