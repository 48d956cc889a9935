//! Integration tests for the catalog gateway and photo resolution
//!
//! Run with: cargo test --test gateway_integration_test
//!
//! The Supabase backend and the Telegram Bot API are faked with wiremock,
//! so these tests exercise the real HTTP paths without the network.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use averon_catalog::catalog::{CatalogGateway, SupabaseSource};
use averon_catalog::telegram::PhotoResolver;

const BOT_TOKEN: &str = "123456:TESTTOKEN";

fn product_row(id: i64, photos: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Товар {}", id),
        "description": "Описание",
        "price": 1000,
        "categories": ["electronics"],
        "stock_rf": 2,
        "stock_china": 0,
        "photos": photos,
        "is_active": true
    })
}

async fn telegram_mock(file_id: &str, file_path: &str, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/bot{}/getFile", BOT_TOKEN)))
        .and(query_param("file_id", file_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "file_path": file_path }
        })))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

// ============================================================================
// Photo Resolver
// ============================================================================

mod photo_resolver {
    use super::*;

    #[tokio::test]
    async fn test_file_id_resolution_is_idempotent_with_one_lookup() {
        let telegram = telegram_mock("AgACAfirst", "photos/file_1.jpg", 1).await;
        let resolver = PhotoResolver::with_api_base(reqwest::Client::new(), BOT_TOKEN, telegram.uri());

        let first = resolver.resolve("AgACAfirst").await;
        let second = resolver.resolve("AgACAfirst").await;

        assert_eq!(first, second);
        assert_eq!(
            first,
            format!("{}/file/bot{}/photos/file_1.jpg", telegram.uri(), BOT_TOKEN)
        );
        // wiremock verifies expect(1) on drop: the second resolution came
        // from the cache, not the network
    }

    #[tokio::test]
    async fn test_direct_url_triggers_no_lookup() {
        let telegram = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&telegram)
            .await;

        let resolver = PhotoResolver::with_api_base(reqwest::Client::new(), BOT_TOKEN, telegram.uri());
        assert_eq!(resolver.resolve("https://x/y.png").await, "https://x/y.png");
    }

    #[tokio::test]
    async fn test_failed_lookup_memoizes_placeholder() {
        let telegram = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/bot{}/getFile", BOT_TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": false })))
            .expect(1)
            .mount(&telegram)
            .await;

        let resolver = PhotoResolver::with_api_base(reqwest::Client::new(), BOT_TOKEN, telegram.uri());
        let first = resolver.resolve("AgACAbroken").await;
        let second = resolver.resolve("AgACAbroken").await;

        assert_eq!(first, PhotoResolver::placeholder_url());
        assert_eq!(second, PhotoResolver::placeholder_url());
    }
}

// ============================================================================
// Supabase Source + Gateway
// ============================================================================

mod gateway {
    use super::*;

    async fn gateway_against(supabase: &MockServer, telegram: &MockServer) -> CatalogGateway {
        let client = reqwest::Client::new();
        let source = SupabaseSource::new(client.clone(), supabase.uri(), "anon-key");
        let resolver = Arc::new(PhotoResolver::with_api_base(client, BOT_TOKEN, telegram.uri()));
        CatalogGateway::new(Box::new(source), resolver)
    }

    #[tokio::test]
    async fn test_list_products_resolves_photos_in_order() {
        let supabase = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("is_active", "eq.true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                product_row(1, json!(["https://x/a.png", "AgACAfirst", ""])),
            ])))
            .mount(&supabase)
            .await;
        let telegram = telegram_mock("AgACAfirst", "photos/file_1.jpg", 1).await;

        let gw = gateway_against(&supabase, &telegram).await;
        let products = gw.list_products(None).await;

        assert_eq!(products.len(), 1);
        assert_eq!(
            products[0].photos,
            vec![
                "https://x/a.png".to_string(),
                format!("{}/file/bot{}/photos/file_1.jpg", telegram.uri(), BOT_TOKEN),
                PhotoResolver::placeholder_url().to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_shared_file_id_costs_one_lookup_across_products() {
        let supabase = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                product_row(1, json!(["AgACAfirst"])),
                product_row(2, json!(["AgACAfirst"])),
            ])))
            .mount(&supabase)
            .await;
        // Bounded concurrency can race two first-writes for the same id;
        // allow either but require at least one and equal results
        let telegram = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/bot{}/getFile", BOT_TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "file_path": "photos/file_1.jpg" }
            })))
            .mount(&telegram)
            .await;

        let gw = gateway_against(&supabase, &telegram).await;
        let products = gw.list_products(None).await;

        assert_eq!(products[0].photos, products[1].photos);

        // A second listing must be served entirely from the cache
        let before = gw.resolver().cache_len();
        let _ = gw.list_products(None).await;
        assert_eq!(gw.resolver().cache_len(), before);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let supabase = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("id", "eq.42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&supabase)
            .await;
        let telegram = MockServer::start().await;

        let gw = gateway_against(&supabase, &telegram).await;
        assert!(gw.get_product(42).await.is_none());
    }

    #[tokio::test]
    async fn test_backend_500_degrades_to_empty_list() {
        let supabase = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&supabase)
            .await;
        let telegram = MockServer::start().await;

        let gw = gateway_against(&supabase, &telegram).await;
        assert!(gw.list_products(None).await.is_empty());
        assert_eq!(gw.list_categories().await, vec!["Все"]);
    }

    #[tokio::test]
    async fn test_categories_come_from_categories_table() {
        let supabase = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .and(query_param("is_active", "eq.true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "accessories" },
                { "name": "electronics" },
                { "name": "  " },
            ])))
            .mount(&supabase)
            .await;
        let telegram = MockServer::start().await;

        let gw = gateway_against(&supabase, &telegram).await;
        assert_eq!(gw.list_categories().await, vec!["Все", "accessories", "electronics"]);
    }

    #[tokio::test]
    async fn test_products_without_photos_get_a_placeholder() {
        let supabase = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                product_row(1, json!([])),
            ])))
            .mount(&supabase)
            .await;
        let telegram = MockServer::start().await;

        let gw = gateway_against(&supabase, &telegram).await;
        let products = gw.list_products(None).await;
        assert_eq!(products[0].photos.len(), 1);
        assert!(products[0].photos[0].starts_with("https://"));
    }
}
