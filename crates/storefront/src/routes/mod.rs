//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Catalog
//! GET    /api/products[?featured=true]    - Product listing
//! GET    /api/products/{slug}             - Product detail
//! GET    /api/collections                 - Collection listing
//! GET    /api/collections/{slug}          - Collection detail
//! GET    /api/collections/{slug}/products - Products in a collection
//! GET    /api/posts                       - Blog posts, newest first
//! GET    /api/posts/{id}                  - Blog post detail
//!
//! # Cart (session-backed)
//! GET    /api/cart                        - Items and order summary
//! POST   /api/cart/items                  - Add item
//! PATCH  /api/cart/items/{id}             - Update quantity
//! DELETE /api/cart/items/{id}             - Remove item
//! DELETE /api/cart                        - Clear cart
//!
//! # Auth (strict rate limit)
//! GET    /api/auth/me                     - Current user
//! PATCH  /api/auth/me                     - Update profile (requires login)
//! POST   /api/auth/login                  - Login
//! POST   /api/auth/register               - Register
//! POST   /api/auth/logout                 - Logout
//!
//! # Contact and newsletter (strict rate limit)
//! POST   /api/contact                     - Contact form
//! POST   /api/newsletter                  - Newsletter signup
//! ```

pub mod auth;
pub mod blog;
pub mod cart;
pub mod collections;
pub mod contact;
pub mod newsletter;
pub mod products;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn,
    routing::{get, patch, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::config::StorefrontConfig;
use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, create_session_layer, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{slug}", get(collections::show))
        .route("/{slug}/products", get(collections::products))
}

/// Create the blog routes router.
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{id}", get(blog::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth::me).patch(auth::update_me))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all `/api` routes with their rate limits.
pub fn api_routes() -> Router<AppState> {
    let strict = Router::new()
        .nest("/auth", auth_routes())
        .route("/contact", post(contact::submit))
        .route("/newsletter", post(newsletter::subscribe))
        .layer(auth_rate_limiter());

    Router::new()
        .nest("/products", product_routes())
        .nest("/collections", collection_routes())
        .nest("/posts", post_routes())
        .nest("/cart", cart_routes())
        .layer(api_rate_limiter())
        .merge(strict)
}

/// CORS for a frontend served from the public base URL.
fn cors_layer(config: &StorefrontConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(config.base_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(e) => {
            tracing::warn!(error = %e, "Base URL is not a valid origin; CORS disabled");
            layer
        }
    }
}

/// Build the full application router.
///
/// Sentry layers are added by the binary so tests run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let cors = cors_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the content store.
async fn health() -> &'static str {
    "ok"
}
