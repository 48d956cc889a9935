use once_cell::sync::Lazy;
use std::env;

/// Configuration constants for the catalog service
/// Supabase project URL (PostgREST endpoint lives under {url}/rest/v1)
/// Read once at startup from SUPABASE_URL environment variable
pub static SUPABASE_URL: Lazy<String> = Lazy::new(|| env::var("SUPABASE_URL").unwrap_or_else(|_| String::new()));

/// Supabase anonymous key, sent as both `apikey` and bearer token
/// Read from SUPABASE_ANON_KEY environment variable
/// The catalog is read-only, so the anon role is all we ever need
pub static SUPABASE_ANON_KEY: Lazy<String> =
    Lazy::new(|| env::var("SUPABASE_ANON_KEY").unwrap_or_else(|_| String::new()));

/// Bot token used for resolving Telegram photo file_ids via the Bot API
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
/// When empty, photo resolution degrades to placeholders (never an error)
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Base URL of the Telegram Bot API
/// Overridable via TELEGRAM_API_URL for tests and self-hosted bot API servers
pub static TELEGRAM_API_URL: Lazy<String> =
    Lazy::new(|| env::var("TELEGRAM_API_URL").unwrap_or_else(|_| "https://api.telegram.org".to_string()));

/// Catalog source selection: "live" (Supabase) or "seed" (fixed dev data)
/// Read from CATALOG_SOURCE environment variable
/// Default: live
pub static CATALOG_SOURCE: Lazy<String> =
    Lazy::new(|| env::var("CATALOG_SOURCE").unwrap_or_else(|_| "live".to_string()));

/// Port for the Mini App web server
/// Read from WEB_PORT environment variable
/// Default: 3000
pub static WEB_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEB_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Photo resolution configuration
pub mod photos {
    /// Prefix convention for Telegram photo file identifiers.
    /// Photo references starting with this are resolved through the Bot API;
    /// everything else is either a direct URL or a placeholder case.
    pub const FILE_ID_PREFIX: &str = "AgACA";

    /// Maximum number of photo resolutions in flight per gateway call.
    /// Keeps large photo sets from serializing one-by-one without
    /// saturating the Bot API.
    pub const MAX_CONCURRENT_RESOLUTIONS: usize = 8;

    /// Placeholder returned for empty/unresolvable references
    pub const PLACEHOLDER_URL: &str = "https://via.placeholder.com/400x400/007acc/ffffff?text=%D0%A4%D0%BE%D1%82%D0%BE";

    /// Small fixed pool used to synthesize a photo for products with none.
    /// One entry is picked arbitrarily so every product renders with
    /// at least one image.
    pub const PLACEHOLDER_POOL: [&str; 3] = [
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&h=400&fit=crop",
        "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=400&h=400&fit=crop",
        "https://images.unsplash.com/photo-1571945153237-4929e783af4a?w=400&h=400&fit=crop",
    ];
}

/// Bulk preload configuration
pub mod preload {
    /// Number of concurrent preload workers
    pub const CONCURRENCY: usize = 4;

    /// Only the first N visible products get their photos preloaded
    pub const MAX_PRODUCTS: usize = 24;

    /// Photos per product considered for preloading
    pub const PHOTOS_PER_PRODUCT: usize = 3;
}

/// Carousel configuration
pub mod carousel {
    /// Horizontal drag distance (px) past which a release paginates
    pub const DRAG_THRESHOLD_PX: f32 = 80.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_prefix_matches_telegram_convention() {
        assert!("AgACAgIAAxkBAAIB".starts_with(photos::FILE_ID_PREFIX));
        assert!(!"https://example.com/a.png".starts_with(photos::FILE_ID_PREFIX));
    }

    #[test]
    fn test_placeholder_pool_is_non_empty() {
        assert!(!photos::PLACEHOLDER_POOL.is_empty());
        for url in photos::PLACEHOLDER_POOL {
            assert!(url.starts_with("https://"));
        }
    }
}
