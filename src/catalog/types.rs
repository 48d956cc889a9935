//! Catalog data model and row normalization.
//!
//! Everything downstream of the gateway works with the strictly-typed
//! [`Product`]. All the shape-sniffing the backend forces on us (sizes stored
//! as a JSON string in some rows and an array in others, `category` vs
//! `categories`, a bare `avito_link` next to tagged marketplace links) is
//! centralized here in [`ProductRow::normalize`] so nothing else in the crate
//! ever re-detects field shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Product gender facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unisex,
    Kids,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
            Gender::Kids => "kids",
            Gender::Other => "other",
        }
    }

    /// Russian display label, as shown in the filter controls
    pub fn display_name(&self) -> &'static str {
        match self {
            Gender::Male => "Мужской",
            Gender::Female => "Женский",
            Gender::Unisex => "Унисекс",
            Gender::Kids => "Детский",
            Gender::Other => "Другое",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "unisex" => Ok(Gender::Unisex),
            "kids" => Ok(Gender::Kids),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// An external marketplace listing for a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceLink {
    /// Marketplace tag, e.g. "avito"
    pub marketplace: String,
    pub url: String,
}

/// A fully normalized catalog product.
///
/// `photos` holds displayable URLs once the product has passed through the
/// gateway; before that it may still contain raw Telegram file_ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whole currency units, never negative
    pub price: u64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Units in stock at the domestic warehouse (RF)
    #[serde(default)]
    pub stock_domestic: u32,
    /// Units in stock at the overseas warehouse (China)
    #[serde(default)]
    pub stock_overseas: u32,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub marketplace_links: Vec<MarketplaceLink>,
    pub is_active: bool,
}

impl Product {
    /// Size tokens flattened to trimmed, non-empty strings.
    ///
    /// Sizes are already normalized at the gateway boundary, but rows that
    /// bypassed it (tests, seed data edits) may still carry padding.
    pub fn size_tokens(&self) -> Vec<String> {
        normalize_tokens(&self.sizes)
    }
}

/// Raw backend row as PostgREST returns it, before normalization.
///
/// Loosely typed on purpose: the production table has gone through several
/// schema iterations and old rows still carry the previous shapes.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    /// Either `categories` (array) or legacy `category` (single string)
    #[serde(default)]
    pub categories: Option<Value>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// Array, JSON-encoded string, or comma-separated string
    #[serde(default)]
    pub sizes: Option<Value>,
    #[serde(default)]
    pub colors: Option<Value>,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub stock_rf: Option<i64>,
    #[serde(default)]
    pub stock_china: Option<i64>,
    /// Array of photo references (URLs or Telegram file_ids)
    #[serde(default)]
    pub photos: Option<Value>,
    #[serde(default)]
    pub avito_link: Option<String>,
    #[serde(default)]
    pub marketplace_links: Option<Value>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductRow {
    /// Produce a strictly-typed [`Product`] from a raw row.
    ///
    /// Malformed or missing fields become safe empty defaults, never errors:
    /// negative prices/stock clamp to zero, unknown genders become `None`,
    /// non-string photo entries are dropped silently.
    pub fn normalize(self) -> Product {
        let mut categories = string_set(self.categories.as_ref());
        if categories.is_empty() {
            if let Some(cat) = self.category {
                let cat = cat.trim().to_string();
                if !cat.is_empty() {
                    categories.push(cat);
                }
            }
        }

        let mut marketplace_links: Vec<MarketplaceLink> = Vec::new();
        if let Some(Value::Array(items)) = self.marketplace_links {
            for item in items {
                if let (Some(marketplace), Some(url)) = (
                    item.get("marketplace").and_then(Value::as_str),
                    item.get("url").and_then(Value::as_str),
                ) {
                    marketplace_links.push(MarketplaceLink {
                        marketplace: marketplace.to_string(),
                        url: url.to_string(),
                    });
                }
            }
        }
        if let Some(link) = self.avito_link {
            if !link.trim().is_empty() {
                marketplace_links.push(MarketplaceLink {
                    marketplace: "avito".to_string(),
                    url: link,
                });
            }
        }

        Product {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or(0).max(0) as u64,
            categories,
            brand: self.brand.filter(|b| !b.trim().is_empty()),
            gender: self.gender.as_deref().and_then(|g| g.parse().ok()),
            sizes: string_set(self.sizes.as_ref()),
            colors: string_set(self.colors.as_ref()),
            tags: string_set(self.tags.as_ref()),
            stock_domestic: self.stock_rf.unwrap_or(0).max(0) as u32,
            stock_overseas: self.stock_china.unwrap_or(0).max(0) as u32,
            photos: photo_refs(self.photos.as_ref()),
            marketplace_links,
            is_active: self.is_active,
        }
    }
}

/// Normalize a loosely shaped set field into trimmed, non-empty tokens.
///
/// Accepts a JSON array of strings, a JSON-encoded array stored as a string
/// ("[\"M\",\"L\"]" — the admin panel did this for a while), or a plain
/// comma-separated string.
pub fn string_set(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => normalize_tokens(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
                .as_slice(),
        ),
        Some(Value::String(s)) => {
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(s) {
                return normalize_tokens(
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                        .as_slice(),
                );
            }
            normalize_tokens(s.split(',').map(str::to_string).collect::<Vec<_>>().as_slice())
        }
        _ => Vec::new(),
    }
}

/// Photo references: array of strings, non-string entries dropped silently.
/// A bare string is treated as a single-photo set.
fn photo_refs(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn normalize_tokens(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Stock-location constraint for the filter pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockFilter {
    /// No constraint
    #[default]
    Any,
    /// Domestic (RF) stock > 0
    Domestic,
    /// Overseas (China) stock > 0
    Overseas,
    /// Both locations > 0
    Both,
}

impl FromStr for StockFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "any" => Ok(StockFilter::Any),
            "rf" | "domestic" => Ok(StockFilter::Domestic),
            "china" | "overseas" => Ok(StockFilter::Overseas),
            "both" => Ok(StockFilter::Both),
            _ => Err(format!("Unknown stock filter: {}", s)),
        }
    }
}

/// Sort mode for the filter pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "priceAsc")]
    PriceAsc,
    #[serde(rename = "priceDesc")]
    PriceDesc,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SortMode::None),
            "priceAsc" => Ok(SortMode::PriceAsc),
            "priceDesc" => Ok(SortMode::PriceDesc),
            _ => Err(format!("Unknown sort mode: {}", s)),
        }
    }
}

/// Snapshot of the filter controls.
///
/// Price bounds are kept as the raw text the user typed; the pipeline parses
/// them and silently ignores anything that is not an integer. An empty
/// selected-set means "no constraint from that facet", not "exclude all".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub price_from: Option<String>,
    #[serde(default)]
    pub price_to: Option<String>,
    #[serde(default)]
    pub stock_location: StockFilter,
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub selected_categories: Vec<String>,
    #[serde(default)]
    pub selected_brands: Vec<String>,
    #[serde(default)]
    pub selected_sizes: Vec<String>,
    #[serde(default)]
    pub selected_genders: Vec<Gender>,
}
