//! End-to-end tests of the HTTP API against a mock content store.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use carter_chaos_storefront::config::{SanityConfig, StorefrontConfig};
use carter_chaos_storefront::routes;
use carter_chaos_storefront::state::AppState;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH: &str = "/v2024-01-01/data/query/production";

/// A router plus the session cookie returned by the last response.
struct TestApp {
    router: Router,
    client_ip: &'static str,
    cookie: Option<String>,
}

struct TestResponse {
    status: StatusCode,
    headers: axum::http::HeaderMap,
    body: Value,
}

impl TestApp {
    fn new(server: &MockServer, client_ip: &'static str) -> Self {
        let config = StorefrontConfig {
            sanity: SanityConfig {
                project_id: "P1".to_string(),
                api_base_url: Some(server.uri()),
                cache_ttl: Duration::ZERO,
                ..SanityConfig::default()
            },
            auth_delay: Duration::ZERO,
            contact_delay: Duration::ZERO,
            newsletter_delay: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        Self {
            router: routes::app(AppState::new(config).unwrap()),
            client_ip,
            cookie: None,
        }
    }

    async fn request(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-real-ip", self.client_ip);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn get(&mut self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }
}

fn envelope(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": result }))
}

fn hoodie() -> Value {
    json!({
        "_id": "p1",
        "title": "Chaos Hoodie",
        "slug": { "current": "chaos-hoodie" },
        "price": 59.99,
        "category": "hoodies",
        "sizes": ["M", "L"],
        "colors": ["Black"],
        "stock": 3,
        "featured": true,
        "mainImage": { "asset": { "_ref": "image-abc123-800x600-jpg" } }
    })
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

async fn mount_hoodie(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$slug", "\"chaos-hoodie\""))
        .respond_with(envelope(hoodie()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let server = MockServer::start().await;
    let mut app = TestApp::new(&server, "10.0.0.1");

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Value::String("ok".to_string()));
    assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_product_detail_and_missing_product() {
    let server = MockServer::start().await;
    mount_hoodie(&server).await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$slug", "\"nonexistent\""))
        .respond_with(envelope(Value::Null))
        .mount(&server)
        .await;
    let mut app = TestApp::new(&server, "10.0.0.2");

    let found = app.get("/api/products/chaos-hoodie").await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["slug"], "chaos-hoodie");
    assert_eq!(
        found.body["main_image"]["url"],
        "https://cdn.sanity.io/images/P1/production/abc123-800x600.jpg"
    );

    let missing = app.get("/api/products/nonexistent").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.body["error"].is_string());
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;
    let mut app = TestApp::new(&server, "10.0.0.3");

    let response = app.get("/api/collections").await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "External service error");
}

#[tokio::test]
async fn test_cart_lifecycle_in_session() {
    let server = MockServer::start().await;
    mount_hoodie(&server).await;
    let mut app = TestApp::new(&server, "10.0.0.4");

    let empty = app.get("/api/cart").await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["quantity"], 0);
    assert_eq!(decimal(&empty.body["summary"]["shipping"]), Decimal::ZERO);

    let added = app
        .post(
            "/api/cart/items",
            json!({ "slug": "chaos-hoodie", "quantity": 1, "size": "M", "color": "Black" }),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.body["items"][0]["variant_id"], "p1:M:Black");
    assert_eq!(decimal(&added.body["summary"]["shipping"]), Decimal::new(999, 2));

    let updated = app
        .request(
            Method::PATCH,
            "/api/cart/items/p1",
            Some(json!({ "quantity": 2 })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["quantity"], 2);
    let summary = &updated.body["summary"];
    assert_eq!(decimal(&summary["subtotal"]), Decimal::new(11998, 2));
    assert_eq!(decimal(&summary["shipping"]), Decimal::ZERO);
    assert_eq!(decimal(&summary["tax"]), Decimal::new(960, 2));
    assert_eq!(decimal(&summary["total"]), Decimal::new(12958, 2));

    let persisted = app.get("/api/cart").await;
    assert_eq!(persisted.body["quantity"], 2);

    let removed = app
        .request(
            Method::PATCH,
            "/api/cart/items/p1",
            Some(json!({ "quantity": 0 })),
        )
        .await;
    assert_eq!(removed.body["items"], json!([]));
}

#[tokio::test]
async fn test_cart_rejects_unavailable_options() {
    let server = MockServer::start().await;
    mount_hoodie(&server).await;
    let mut app = TestApp::new(&server, "10.0.0.5");

    let bad_size = app
        .post("/api/cart/items", json!({ "slug": "chaos-hoodie", "size": "XS" }))
        .await;
    assert_eq!(bad_size.status, StatusCode::BAD_REQUEST);

    let too_many = app
        .post("/api/cart/items", json!({ "slug": "chaos-hoodie", "quantity": 4 }))
        .await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);

    let cart = app.get("/api/cart").await;
    assert_eq!(cart.body["quantity"], 0);
}

#[tokio::test]
async fn test_login_profile_update_and_logout() {
    let server = MockServer::start().await;
    let mut app = TestApp::new(&server, "10.0.0.6");

    let anonymous = app.get("/api/auth/me").await;
    assert_eq!(anonymous.body["is_authenticated"], false);

    let unauthorized = app
        .request(
            Method::PATCH,
            "/api/auth/me",
            Some(json!({ "first_name": "Ada" })),
        )
        .await;
    assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);

    let login = app
        .post(
            "/api/auth/login",
            json!({ "email": "Ada@Example.com", "password": "hunter2" }),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["is_authenticated"], true);
    assert_eq!(login.body["user"]["email"], "ada@example.com");
    assert_eq!(login.body["user"]["first_name"], "Demo");

    let updated = app
        .request(
            Method::PATCH,
            "/api/auth/me",
            Some(json!({ "first_name": "Ada" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["user"]["first_name"], "Ada");
    assert_eq!(updated.body["user"]["last_name"], "User");

    let logout = app.post("/api/auth/logout", json!({})).await;
    assert_eq!(logout.body["is_authenticated"], false);
}

#[tokio::test]
async fn test_register_and_invalid_login() {
    let server = MockServer::start().await;
    let mut app = TestApp::new(&server, "10.0.0.7");

    let bad_email = app
        .post(
            "/api/auth/login",
            json!({ "email": "not-an-email", "password": "pw" }),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["error"], "Invalid email address");

    let registered = app
        .post(
            "/api/auth/register",
            json!({
                "email": "grace@example.com",
                "password": "pw",
                "first_name": " Grace ",
                "last_name": "Hopper",
                "phone": "555-0100"
            }),
        )
        .await;
    assert_eq!(registered.status, StatusCode::OK);
    assert_eq!(registered.body["user"]["first_name"], "Grace");
    assert_eq!(registered.body["user"]["phone"], "555-0100");

    let me = app.get("/api/auth/me").await;
    assert_eq!(me.body["user"]["email"], "grace@example.com");
}

#[tokio::test]
async fn test_contact_form() {
    let server = MockServer::start().await;
    let mut app = TestApp::new(&server, "10.0.0.8");

    let sent = app
        .post(
            "/api/contact",
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "subject": "Collab",
                "message": "Hello"
            }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    assert_eq!(sent.body["success"], true);

    let rejected = app
        .post(
            "/api/contact",
            json!({ "name": "", "email": "ada@example.com", "subject": "s", "message": "m" }),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_newsletter_signup() {
    let server = MockServer::start().await;
    let mut app = TestApp::new(&server, "10.0.0.9");

    let joined = app
        .post("/api/newsletter", json!({ "email": " Fan@Example.com " }))
        .await;
    assert_eq!(joined.status, StatusCode::OK);
    assert_eq!(joined.body["success"], true);

    let rejected = app
        .post("/api/newsletter", json!({ "email": "fan-at-example" }))
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        rejected.body["error"],
        "Bad request: Please enter a valid email address."
    );
}
