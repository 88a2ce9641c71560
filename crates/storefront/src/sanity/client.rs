//! Sanity query API client implementation.
//!
//! Issues GROQ queries with `reqwest` and caches raw results using `moka`.

use std::sync::Arc;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use super::SanityError;
use super::conversions::{convert_all, convert_collection, convert_post, convert_product};
use super::documents::{ErrorResponse, QueryResponse, RawCollection, RawPost, RawProduct};
use super::image::ImageUrlBuilder;
use super::queries;
use super::types::{Collection, Image, Post, Product};
use crate::config::SanityConfig;

/// Maximum number of cached query results.
const CACHE_CAPACITY: u64 = 1000;

/// Characters of an upstream body kept in logs and error messages.
const BODY_EXCERPT_LEN: usize = 500;

// =============================================================================
// SanityClient
// =============================================================================

/// Client for the Sanity query API.
///
/// Provides typed, read-only access to products, collections, and blog posts.
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    query_url: String,
    token: Option<SecretString>,
    images: ImageUrlBuilder,
    cache: Option<Cache<String, Arc<Value>>>,
}

impl std::fmt::Debug for SanityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityClient")
            .field("query_url", &self.inner.query_url)
            .field("cached", &self.inner.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl SanityClient {
    /// Create a new Sanity client.
    ///
    /// # Errors
    ///
    /// Returns `SanityError::Config` if the HTTP client cannot be built.
    pub fn new(config: &SanityConfig) -> Result<Self, SanityError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| SanityError::Config(e.to_string()))?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(SanityClientInner {
                client,
                query_url: config.query_url(),
                token: config.token.clone(),
                images: ImageUrlBuilder::from_config(config),
                cache,
            }),
        })
    }

    /// The image URL builder for this project and dataset.
    #[must_use]
    pub fn images(&self) -> &ImageUrlBuilder {
        &self.inner.images
    }

    /// Resolve an image to a URL. Never fails; see [`ImageUrlBuilder::resolve`].
    #[must_use]
    pub fn resolve_image_url(&self, image: Option<&Image>) -> String {
        self.inner.images.resolve(image)
    }

    /// Drop every cached query result.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
        }
    }

    /// Execute a GROQ query and return the raw `result` value.
    ///
    /// `params` are substituted server-side as `$name`; values are sent
    /// JSON-encoded as the API expects.
    async fn query_raw(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<Arc<Value>, SanityError> {
        let encoded: Vec<(String, String)> = params
            .iter()
            .map(|(name, value)| Ok((format!("${name}"), serde_json::to_string(value)?)))
            .collect::<Result<_, serde_json::Error>>()?;

        let cache_key = format!("{query}\u{1f}{encoded:?}");
        if let Some(cache) = &self.inner.cache
            && let Some(hit) = cache.get(&cache_key).await
        {
            debug!("Cache hit for query");
            return Ok(hit);
        }

        let mut request = self
            .inner
            .client
            .get(&self.inner.query_url)
            .query(&[("query", query)])
            .query(&encoded);

        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SanityError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let excerpt: String = response_text.chars().take(BODY_EXCERPT_LEN).collect();
            tracing::error!(
                status = %status,
                body = %excerpt,
                "Sanity API returned non-success status"
            );
            let message = serde_json::from_str::<ErrorResponse>(&response_text)
                .ok()
                .and_then(|e| e.error.description.or(e.error.kind))
                .unwrap_or(excerpt);
            return Err(SanityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: QueryResponse<Value> = serde_json::from_str(&response_text)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(BODY_EXCERPT_LEN).collect::<String>(),
                    "Failed to parse Sanity query response"
                );
                SanityError::Parse(e)
            })?;

        debug!(server_ms = ?envelope.ms, "Sanity query complete");

        let result = Arc::new(envelope.result);
        if let Some(cache) = &self.inner.cache {
            cache.insert(cache_key, Arc::clone(&result)).await;
        }
        Ok(result)
    }

    /// Execute a query and deserialize its result.
    async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SanityError> {
        let value = self.query_raw(query, params).await?;
        Ok(T::deserialize(value.as_ref())?)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get every product, each with its collection reference resolved.
    ///
    /// Documents that fail validation are skipped and logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, SanityError> {
        let raw: Option<Vec<Value>> = self.fetch(&queries::list_products(), &[]).await?;
        Ok(convert_all("product", raw.unwrap_or_default(), convert_product))
    }

    /// Get a product by its slug.
    ///
    /// Returns `Ok(None)` when no product has that slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is blank, the API request fails, or the
    /// matching document fails validation.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Option<Product>, SanityError> {
        let slug = required_param("slug", slug)?;
        let raw: Option<RawProduct> = self
            .fetch(&queries::product_by_slug(), &[("slug", slug)])
            .await?;
        Ok(raw.map(convert_product).transpose()?)
    }

    /// Get the products flagged as featured.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_featured_products(&self) -> Result<Vec<Product>, SanityError> {
        let raw: Option<Vec<Value>> =
            self.fetch(&queries::featured_products(), &[]).await?;
        Ok(convert_all("product", raw.unwrap_or_default(), convert_product))
    }

    /// Get the products whose collection has the given slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is blank or the API request fails.
    #[instrument(skip(self), fields(collection_slug = %slug))]
    pub async fn list_products_by_collection_slug(
        &self,
        slug: &str,
    ) -> Result<Vec<Product>, SanityError> {
        let slug = required_param("collectionSlug", slug)?;
        let raw: Option<Vec<Value>> = self
            .fetch(
                &queries::products_by_collection_slug(),
                &[("collectionSlug", slug)],
            )
            .await?;
        Ok(convert_all("product", raw.unwrap_or_default(), convert_product))
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get every collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_collections(&self) -> Result<Vec<Collection>, SanityError> {
        let raw: Option<Vec<Value>> =
            self.fetch(&queries::list_collections(), &[]).await?;
        Ok(convert_all("collection", raw.unwrap_or_default(), convert_collection))
    }

    /// Get a collection by its slug, including its content body.
    ///
    /// Returns `Ok(None)` when no collection has that slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is blank, the API request fails, or the
    /// matching document fails validation.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_collection_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Collection>, SanityError> {
        let slug = required_param("slug", slug)?;
        let raw: Option<RawCollection> = self
            .fetch(&queries::collection_by_slug(), &[("slug", slug)])
            .await?;
        Ok(raw.map(convert_collection).transpose()?)
    }

    // =========================================================================
    // Blog Methods
    // =========================================================================

    /// Get every blog post in store order.
    ///
    /// Use [`super::sort_newest_first`] for display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_posts(&self) -> Result<Vec<Post>, SanityError> {
        let raw: Option<Vec<Value>> = self.fetch(&queries::list_posts(), &[]).await?;
        Ok(convert_all("post", raw.unwrap_or_default(), convert_post))
    }

    /// Get a blog post by document ID.
    ///
    /// Returns `Ok(None)` when no post has that ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is blank, the API request fails, or the
    /// matching document fails validation.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>, SanityError> {
        let id = required_param("id", id)?;
        let raw: Option<RawPost> = self.fetch(&queries::post_by_id(), &[("id", id)]).await?;
        Ok(raw.map(convert_post).transpose()?)
    }
}

/// Reject blank query parameters before they reach the API.
fn required_param<'a>(name: &str, value: &'a str) -> Result<&'a str, SanityError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SanityError::InvalidParameter(format!(
            "{name} must not be empty"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_param_trims() {
        assert_eq!(required_param("slug", "  tee  ").unwrap(), "tee");
    }

    #[test]
    fn test_required_param_rejects_blank() {
        let err = required_param("slug", "   ").unwrap_err();
        assert!(matches!(err, SanityError::InvalidParameter(_)));
        assert_eq!(err.to_string(), "Invalid parameter: slug must not be empty");
    }

    #[test]
    fn test_new_client_uses_config() {
        let config = SanityConfig {
            project_id: "P1".to_string(),
            ..SanityConfig::default()
        };
        let client = SanityClient::new(&config).unwrap();
        assert_eq!(
            client.resolve_image_url(None),
            crate::sanity::PLACEHOLDER_IMAGE
        );
        assert!(format!("{client:?}").contains("https://P1.api.sanity.io"));
    }
}
