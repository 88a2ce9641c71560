//! Sanity content API client.
//!
//! # Architecture
//!
//! - Read-only GROQ queries over the HTTP query endpoint (`reqwest`)
//! - Sanity is source of truth - NO local sync, direct API calls
//! - Raw documents are validated into domain types at this boundary
//! - In-memory caching via `moka` for query results (configurable TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use carter_chaos_storefront::sanity::SanityClient;
//!
//! let client = SanityClient::new(&config.sanity)?;
//!
//! let featured = client.list_featured_products().await?;
//! let url = client.resolve_image_url(Some(&featured[0].main_image));
//!
//! match client.get_product_by_slug("chaos-hoodie-black").await? {
//!     Some(product) => println!("{}", product.title),
//!     None => println!("not found"),
//! }
//! ```

mod client;
pub mod conversions;
pub mod documents;
pub mod image;
pub mod queries;
pub mod types;

pub use client::SanityClient;
pub use conversions::ConversionError;
pub use image::{ImageUrlBuilder, PLACEHOLDER_IMAGE};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when querying the Sanity content API.
#[derive(Debug, Error)]
pub enum SanityError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Sanity API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Description from the error envelope, or a body excerpt.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Sanity.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A query parameter was rejected before sending.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A single requested document failed validation.
    #[error("Invalid document: {0}")]
    InvalidDocument(#[from] ConversionError),

    /// The HTTP client could not be constructed.
    #[error("Client configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanity_error_display() {
        let err = SanityError::Api {
            status: 400,
            message: "param $slug referenced, but not provided".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sanity API error (400): param $slug referenced, but not provided"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = SanityError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_invalid_document_display() {
        let err = SanityError::from(ConversionError {
            kind: "product",
            id: Some("p1".to_string()),
            reason: "missing price".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid document: invalid product document p1: missing price"
        );
    }
}
