//! Sanity client tests against a mock query endpoint.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use carter_chaos_storefront::config::SanityConfig;
use carter_chaos_storefront::sanity::{PLACEHOLDER_IMAGE, ProductCategory, SanityClient, SanityError, Size};
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH: &str = "/v2024-01-01/data/query/production";

fn config(server: &MockServer) -> SanityConfig {
    SanityConfig {
        project_id: "P1".to_string(),
        api_base_url: Some(server.uri()),
        cache_ttl: Duration::ZERO,
        ..SanityConfig::default()
    }
}

fn client(server: &MockServer) -> SanityClient {
    SanityClient::new(&config(server)).unwrap()
}

fn envelope(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "query": "...", "result": result, "ms": 3 }))
}

fn product(id: &str, slug: &str, price: f64) -> Value {
    json!({
        "_id": id,
        "title": format!("Product {id}"),
        "slug": { "_type": "slug", "current": slug },
        "price": price,
        "category": "hoodies",
        "sizes": ["S", "M", "XXXL"],
        "colors": ["Black"],
        "stock": 4,
        "mainImage": { "asset": { "_id": "image-abc123-800x600-jpg" } },
        "collection": { "_id": "c1", "title": "Chaos Core", "slug": { "current": "chaos-core" } }
    })
}

#[tokio::test]
async fn test_list_products_skips_invalid_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(envelope(json!([
            product("p1", "chaos-hoodie", 59.99),
            product("p2", "free-hoodie", 0.0),
            { "_id": "p3", "title": "No slug", "price": 10, "category": "hoodies" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let products = client(&server).list_products().await.unwrap();

    assert_eq!(products.len(), 1);
    let hoodie = &products[0];
    assert_eq!(hoodie.slug, "chaos-hoodie");
    assert_eq!(hoodie.category, ProductCategory::Hoodies);
    assert_eq!(hoodie.sizes, vec![Size::S, Size::M]);
    assert_eq!(hoodie.collection.as_ref().unwrap().slug, "chaos-core");
}

#[tokio::test]
async fn test_list_survives_mistyped_document() {
    let server = MockServer::start().await;
    let mut drifted = product("p2", "drifted-tee", 29.99);
    drifted["stock"] = json!("5");
    let mut bad_sizes = product("p3", "odd-sizes", 19.0);
    bad_sizes["sizes"] = json!(["M", 32]);
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(envelope(json!([
            product("p1", "chaos-hoodie", 59.99),
            drifted,
            bad_sizes,
            null
        ])))
        .mount(&server)
        .await;

    let products = client(&server).list_products().await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id.as_str(), "p1");
}

#[tokio::test]
async fn test_post_list_survives_mistyped_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(envelope(json!([
            { "_id": "post-1", "title": "Drop 01", "_createdAt": "2024-03-01T12:00:00Z" },
            { "_id": "post-2", "title": ["not", "a", "string"], "_createdAt": "2024-03-02T12:00:00Z" }
        ])))
        .mount(&server)
        .await;

    let posts = client(&server).list_posts().await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Drop 01");
}

#[tokio::test]
async fn test_get_product_by_slug_sends_json_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$slug", "\"chaos-hoodie\""))
        .respond_with(envelope(product("p1", "chaos-hoodie", 59.99)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let hoodie = client
        .get_product_by_slug("chaos-hoodie")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(hoodie.id.as_str(), "p1");
    assert_eq!(
        client.resolve_image_url(Some(&hoodie.main_image)),
        "https://cdn.sanity.io/images/P1/production/abc123-800x600.jpg"
    );
}

#[tokio::test]
async fn test_get_product_by_slug_nonexistent_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$slug", "\"nonexistent\""))
        .respond_with(envelope(Value::Null))
        .mount(&server)
        .await;

    let result = client(&server).get_product_by_slug("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_blank_slug_is_rejected_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(envelope(Value::Null))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).get_product_by_slug("  ").await.unwrap_err();
    assert!(matches!(err, SanityError::InvalidParameter(_)));
}

#[tokio::test]
async fn test_invalid_single_document_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(envelope(product("p1", "broken", -5.0)))
        .mount(&server)
        .await;

    let err = client(&server).get_product_by_slug("broken").await.unwrap_err();
    assert!(matches!(err, SanityError::InvalidDocument(_)));
}

#[tokio::test]
async fn test_api_error_envelope_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "description": "expected '}' following object body",
                "type": "queryParseError"
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server).list_collections().await.unwrap_err();
    match err {
        SanityError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "expected '}' following object body");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let err = client(&server).list_posts().await.unwrap_err();
    assert!(matches!(err, SanityError::RateLimited(12)));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list_products().await.unwrap_err();
    assert!(matches!(err, SanityError::Parse(_)));
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer sk_test"))
        .respond_with(envelope(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = SanityConfig {
        token: Some(SecretString::from("sk_test")),
        ..config(&server)
    };
    let collections = SanityClient::new(&config)
        .unwrap()
        .list_collections()
        .await
        .unwrap();
    assert!(collections.is_empty());
}

#[tokio::test]
async fn test_cache_serves_repeated_queries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .respond_with(envelope(json!([product("p1", "chaos-hoodie", 59.99)])))
        .expect(1)
        .mount(&server)
        .await;

    let config = SanityConfig {
        cache_ttl: Duration::from_secs(60),
        ..config(&server)
    };
    let client = SanityClient::new(&config).unwrap();

    assert_eq!(client.list_featured_products().await.unwrap().len(), 1);
    assert_eq!(client.list_featured_products().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_products_by_collection_slug() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$collectionSlug", "\"chaos-core\""))
        .respond_with(envelope(json!([
            product("p1", "chaos-hoodie", 59.99),
            product("p2", "chaos-tee", 29.0)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let products = client(&server)
        .list_products_by_collection_slug("chaos-core")
        .await
        .unwrap();
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_collection_and_post_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$slug", "\"chaos-core\""))
        .respond_with(envelope(json!({
            "_id": "c1",
            "title": "Chaos Core",
            "slug": { "current": "chaos-core" },
            "category": "basics",
            "itemCount": -3,
            "content": [{ "_type": "block", "children": [{ "text": "Core pieces." }] }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$id", "\"post-1\""))
        .respond_with(envelope(json!({
            "_id": "post-1",
            "title": "Drop 01",
            "_createdAt": "2024-03-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let client = client(&server);

    let collection = client
        .get_collection_by_slug("chaos-core")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(collection.item_count, 0);
    assert!(collection.content.is_some());
    assert_eq!(client.resolve_image_url(Some(&collection.image)), PLACEHOLDER_IMAGE);

    let post = client.get_post_by_id("post-1").await.unwrap().unwrap();
    assert_eq!(post.title, "Drop 01");
    assert!(post.cover_image.is_none());
}
