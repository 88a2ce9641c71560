//! Raw documents as returned by the GROQ projections in `queries`.
//!
//! Every field is optional here. The studio schema marks fields as required,
//! but drafts, deleted references, and schema drift all produce documents
//! that break those rules, so validation happens in `conversions`.

use serde::Deserialize;

/// Response envelope of the query endpoint.
#[derive(Debug, Deserialize)]
pub struct QueryResponse<T> {
    pub result: T,
    /// Server-side execution time in milliseconds.
    #[serde(default)]
    pub ms: Option<u64>,
}

/// Error envelope returned with non-success status codes.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSlug {
    pub current: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawDimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImageMetadata {
    pub dimensions: Option<RawDimensions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAsset {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_ref")]
    pub reference: Option<String>,
    pub url: Option<String>,
    pub metadata: Option<RawImageMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    pub asset: Option<RawAsset>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawProductDimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCollectionRef {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<RawSlug>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub slug: Option<RawSlug>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub is_new: Option<bool>,
    pub is_sale: Option<bool>,
    pub featured: Option<bool>,
    pub main_image: Option<RawImage>,
    pub images: Option<Vec<RawImage>>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub stock: Option<f64>,
    pub weight: Option<f64>,
    pub dimensions: Option<RawProductDimensions>,
    pub materials: Option<Vec<String>>,
    pub care: Option<String>,
    pub collection: Option<RawCollectionRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollection {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub slug: Option<RawSlug>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<RawImage>,
    pub images: Option<Vec<RawImage>>,
    pub is_new: Option<bool>,
    pub featured: Option<bool>,
    pub item_count: Option<f64>,
    pub content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    /// Plain text, or Portable Text blocks on newer posts.
    pub content: Option<serde_json::Value>,
    pub cover_image: Option<RawImage>,
    #[serde(rename = "_createdAt")]
    pub created_at: Option<String>,
}
