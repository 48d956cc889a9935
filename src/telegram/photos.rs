//! Telegram photo resolution.
//!
//! Products store photo references either as direct URLs or as Telegram
//! file_ids (the `AgACA…` strings the Bot API hands out for uploaded photos).
//! A file_id resolves through the two-step Bot API lookup: `getFile` returns
//! a `file_path`, and the download URL is constructed from it. Results are
//! memoized per file_id for the lifetime of the resolver, so repeated
//! resolution never costs a second round trip — including failed lookups,
//! which memoize the placeholder (one attempt per id, never retried).

use dashmap::DashMap;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::core::config::{self, photos};

/// Response envelope of the Bot API `getFile` method
#[derive(Debug, Deserialize)]
struct GetFileResponse {
    ok: bool,
    #[serde(default)]
    result: Option<FileInfo>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    #[serde(default)]
    file_path: Option<String>,
}

/// Resolves photo references to displayable URLs, memoizing Bot API lookups.
///
/// Constructed once at startup and owned by the gateway. The cache is an
/// idempotent key→value store: concurrent first-writes for the same file_id
/// produce equal values, so last-writer-wins is harmless and no lock is held
/// across the network call.
pub struct PhotoResolver {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    cache: DashMap<String, String>,
}

impl PhotoResolver {
    /// Create a resolver using the configured Bot API base URL.
    pub fn new(client: reqwest::Client, bot_token: impl Into<String>) -> Self {
        Self::with_api_base(client, bot_token, config::TELEGRAM_API_URL.as_str())
    }

    /// Create a resolver against a specific Bot API base (used by tests and
    /// self-hosted bot API servers).
    pub fn with_api_base(client: reqwest::Client, bot_token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            cache: DashMap::new(),
        }
    }

    /// Whether a reference follows the Telegram file_id convention.
    pub fn is_file_id(photo_ref: &str) -> bool {
        photo_ref.starts_with(photos::FILE_ID_PREFIX)
    }

    /// The fixed placeholder for empty or unresolvable references.
    pub fn placeholder_url() -> &'static str {
        photos::PLACEHOLDER_URL
    }

    /// Pick one entry from the placeholder pool, for products with no photos.
    pub fn synthesized_photo() -> String {
        photos::PLACEHOLDER_POOL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&photos::PLACEHOLDER_URL)
            .to_string()
    }

    /// Resolve a single photo reference to a displayable URL.
    ///
    /// Direct http(s) URLs pass through unchanged with no network call.
    /// File_ids go through the memoized Bot API lookup. Everything else
    /// (empty strings, unknown formats) yields the placeholder. This never
    /// fails: lookup errors degrade to the placeholder.
    pub async fn resolve(&self, photo_ref: &str) -> String {
        if photo_ref.starts_with("http://") || photo_ref.starts_with("https://") {
            return photo_ref.to_string();
        }

        if Self::is_file_id(photo_ref) {
            if let Some(cached) = self.cache.get(photo_ref) {
                return cached.clone();
            }
            let url = self
                .lookup_file_id(photo_ref)
                .await
                .unwrap_or_else(|| Self::placeholder_url().to_string());
            self.cache.insert(photo_ref.to_string(), url.clone());
            return url;
        }

        Self::placeholder_url().to_string()
    }

    /// Resolve a product's full photo reference list, preserving order.
    ///
    /// A product with zero references gets exactly one synthesized photo so
    /// every product always has something to display.
    pub async fn resolve_all(&self, refs: &[String]) -> Vec<String> {
        let mut resolved = Vec::with_capacity(refs.len());
        for r in refs {
            resolved.push(self.resolve(r).await);
        }
        if resolved.is_empty() {
            resolved.push(Self::synthesized_photo());
        }
        resolved
    }

    /// One-shot Bot API lookup; None on any failure or missing metadata.
    async fn lookup_file_id(&self, file_id: &str) -> Option<String> {
        if self.bot_token.is_empty() {
            log::warn!("BOT_TOKEN not configured, photo {} falls back to placeholder", file_id);
            return None;
        }

        let get_file_url = format!(
            "{}/bot{}/getFile?file_id={}",
            self.api_base, self.bot_token, file_id
        );

        let response = match self.client.get(&get_file_url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!("getFile request failed for {}: {}", file_id, e);
                return None;
            }
        };

        let body: GetFileResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("getFile returned malformed JSON for {}: {}", file_id, e);
                return None;
            }
        };

        if !body.ok {
            log::warn!("getFile rejected file_id {}", file_id);
            return None;
        }

        let file_path = body.result.and_then(|r| r.file_path)?;
        Some(format!("{}/file/bot{}/{}", self.api_base, self.bot_token, file_path))
    }

    /// Number of memoized resolutions (diagnostics and tests).
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop all memoized resolutions. Only used on explicit reset; the cache
    /// otherwise lives as long as the process.
    pub fn reset(&self) {
        self.cache.clear();
        log::info!("Photo resolution cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PhotoResolver {
        // Unroutable base: any accidental network call fails fast
        PhotoResolver::with_api_base(reqwest::Client::new(), "", "http://127.0.0.1:1")
    }

    #[tokio::test]
    async fn test_direct_url_passes_through_unchanged() {
        let r = resolver();
        assert_eq!(r.resolve("https://x/y.png").await, "https://x/y.png");
        assert_eq!(r.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_empty_ref_yields_placeholder() {
        let r = resolver();
        assert_eq!(r.resolve("").await, PhotoResolver::placeholder_url());
    }

    #[tokio::test]
    async fn test_unrecognized_ref_yields_placeholder() {
        let r = resolver();
        assert_eq!(r.resolve("not-a-url").await, PhotoResolver::placeholder_url());
    }

    #[tokio::test]
    async fn test_missing_token_degrades_to_placeholder() {
        let r = resolver();
        assert_eq!(r.resolve("AgACAabc123").await, PhotoResolver::placeholder_url());
        // the failed lookup is memoized too — one attempt per id
        assert_eq!(r.cache_len(), 1);
    }

    #[tokio::test]
    async fn test_empty_ref_list_synthesizes_one_photo() {
        let r = resolver();
        let resolved = r.resolve_all(&[]).await;
        assert_eq!(resolved.len(), 1);
        assert!(photos::PLACEHOLDER_POOL.contains(&resolved[0].as_str()));
    }

    #[tokio::test]
    async fn test_reset_clears_cache() {
        let r = resolver();
        let _ = r.resolve("AgACAabc123").await;
        assert_eq!(r.cache_len(), 1);
        r.reset();
        assert_eq!(r.cache_len(), 0);
    }
}
