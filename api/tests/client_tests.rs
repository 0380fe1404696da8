//! HTTP client tests against a mock backend

#![allow(clippy::unwrap_used)] // Tests can unwrap

use serde_json::json;
use storefront_api::{ApiConfig, ProductApiClient};
use storefront_core::{ApiError, Order, Payment, Price, ProductApi, ProductId};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ProductApiClient {
    let config = ApiConfig::new(&format!("{}/api/weblarek/", server.uri()), "https://cdn.test/content").unwrap();
    ProductApiClient::new(&config).unwrap()
}

fn sample_order() -> Order {
    Order {
        payment: Payment::Card,
        address: "Spb Vosstania 1".to_string(),
        email: "test@test.ru".to_string(),
        phone: "+71234567890".to_string(),
        items: vec![ProductId::new("854cef69-976d-4c2a-a18c-2aa45046c390")],
        total: Price::new(750),
    }
}

#[tokio::test]
async fn fetch_catalog_prefixes_images() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weblarek/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "items": [
                {
                    "id": "854cef69-976d-4c2a-a18c-2aa45046c390",
                    "description": "If you plan your day, it will last longer.",
                    "image": "/5_Dots.svg",
                    "title": "+1 hour in a day",
                    "category": "soft-skill",
                    "price": 750
                },
                {
                    "id": "b06cde61-912f-4663-9751-09956c0eed67",
                    "description": "Will get your mom to call you back.",
                    "image": "/Asterisk_2.svg",
                    "title": "Mom timer",
                    "category": "other",
                    "price": null
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server).fetch_catalog().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].image, "https://cdn.test/content/5_Dots.svg");
    assert_eq!(items[0].price, Some(Price::new(750)));
    assert_eq!(items[1].price, None);
}

#[tokio::test]
async fn get_product_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weblarek/product/c101ab44"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c101ab44",
            "description": ["Ships with a cape.", "Cape not included."],
            "image": "/Shell.svg",
            "title": "Framework cube",
            "category": "hard-skill",
            "price": 2500
        })))
        .mount(&server)
        .await;

    let item = client_for(&server)
        .get_product(&ProductId::new("c101ab44"))
        .await
        .unwrap();

    assert_eq!(item.title, "Framework cube");
    assert_eq!(item.image, "https://cdn.test/content/Shell.svg");
    assert_eq!(item.description.to_string(), "Ships with a cape.\nCape not included.");
}

#[tokio::test]
async fn submit_order_posts_flat_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/weblarek/order"))
        .and(body_json(json!({
            "payment": "card",
            "address": "Spb Vosstania 1",
            "email": "test@test.ru",
            "phone": "+71234567890",
            "items": ["854cef69-976d-4c2a-a18c-2aa45046c390"],
            "total": 750
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "28c57cb4-3002-4445-8aa1-2a06a5055ae5",
            "total": 750
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client_for(&server).submit_order(sample_order()).await.unwrap();

    assert_eq!(receipt.id, "28c57cb4-3002-4445-8aa1-2a06a5055ae5");
    assert_eq!(receipt.total, Price::new(750));
}

#[tokio::test]
async fn error_body_becomes_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/weblarek/order"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "Wrong total" })))
        .mount(&server)
        .await;

    let result = client_for(&server).submit_order(sample_order()).await;

    assert_eq!(
        result,
        Err(ApiError::Rejected {
            status: 400,
            message: "Wrong total".to_string(),
        })
    );
}

#[tokio::test]
async fn bare_error_status_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weblarek/product"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_catalog().await;

    assert_eq!(
        result,
        Err(ApiError::Rejected {
            status: 404,
            message: "Not Found".to_string(),
        })
    );
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/weblarek/product"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_catalog().await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let config = ApiConfig::new("http://127.0.0.1:9", "http://cdn.test").unwrap();
    let client = ProductApiClient::new(&config).unwrap();

    let result = client.fetch_catalog().await;

    assert!(matches!(result, Err(ApiError::Transport(_))));
}
