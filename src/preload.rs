//! Bulk photo preloading for the visible product grid.
//!
//! Warms the first photos of the first screenfuls of products with a small
//! fixed pool of workers, so the grid does not issue one request per image
//! at render time. One attempt per URL; a failure is recorded and the render
//! layer falls back to the placeholder. Teardown is cooperative: cancelling
//! stops scheduling new work but does not abort in-flight requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::catalog::types::Product;
use crate::core::config::preload;

/// Outcome of one preload run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreloadReport {
    pub attempted: usize,
    pub failed: usize,
}

/// Collect the URLs worth preloading for a visible product list: the first
/// `PHOTOS_PER_PRODUCT` photos of the first `MAX_PRODUCTS` products,
/// deduplicated, input order preserved.
pub fn collect_urls(products: &[Product]) -> Vec<String> {
    let mut urls = Vec::new();
    for product in products.iter().take(preload::MAX_PRODUCTS) {
        for url in product.photos.iter().take(preload::PHOTOS_PER_PRODUCT) {
            if !url.is_empty() && !urls.contains(url) {
                urls.push(url.clone());
            }
        }
    }
    urls
}

/// Photo preloader with bounded concurrency and cooperative cancellation.
pub struct Preloader {
    client: reqwest::Client,
    cancel: CancellationToken,
}

impl Preloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            cancel: CancellationToken::new(),
        }
    }

    /// Token for tearing the preloader down from outside (e.g. when the
    /// product grid unmounts or the filter changes).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetch every URL once, `preload::CONCURRENCY` requests at a time.
    ///
    /// Workers share a cursor into the URL list; cancellation is checked
    /// between items only, so a request already in flight runs to
    /// completion. Failures count in the report but never propagate.
    pub async fn run(&self, urls: &[String]) -> PreloadReport {
        if urls.is_empty() {
            return PreloadReport::default();
        }

        let cursor = Arc::new(AtomicUsize::new(0));
        let attempted = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));

        let workers = (0..preload::CONCURRENCY).map(|_| {
            let client = self.client.clone();
            let cancel = self.cancel.clone();
            let cursor = Arc::clone(&cursor);
            let attempted = Arc::clone(&attempted);
            let failed = Arc::clone(&failed);
            async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let i = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(url) = urls.get(i) else { break };

                    attempted.fetch_add(1, Ordering::SeqCst);
                    match client.get(url).send().await {
                        Ok(resp) if resp.status().is_success() => {
                            // Drain the body so the bytes actually hit the
                            // HTTP cache layer in front of us
                            let _ = resp.bytes().await;
                        }
                        Ok(resp) => {
                            log::debug!("Preload of {} got status {}", url, resp.status());
                            failed.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(e) => {
                            log::debug!("Preload of {} failed: {}", url, e);
                            failed.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
            }
        });

        join_all(workers).await;

        let report = PreloadReport {
            attempted: attempted.load(Ordering::SeqCst),
            failed: failed.load(Ordering::SeqCst),
        };
        log::info!(
            "Photo preload finished: {} attempted, {} failed",
            report.attempted,
            report.failed
        );
        report
    }
}
