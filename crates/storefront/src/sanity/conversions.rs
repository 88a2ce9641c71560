//! Conversions from raw query documents to validated domain types.
//!
//! Required fields are enforced here; everything else is normalized
//! (unknown enum values dropped, ratings clamped, counts floored at zero).

use std::collections::BTreeSet;
use std::str::FromStr;

use carter_chaos_core::{AssetId, CollectionId, PostId, Price, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::documents::{
    RawCollection, RawCollectionRef, RawImage, RawPost, RawProduct, RawSlug,
};
use super::types::{
    Collection, CollectionCategory, CollectionRef, Color, Dimensions, Image, ImageAsset,
    ImageDimensions, Post, Product, ProductCategory, Size,
};

/// A document that failed validation at the query boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} document {}: {reason}", .id.as_deref().unwrap_or("<no id>"))]
pub struct ConversionError {
    /// Document type (`product`, `collection`, `post`).
    pub kind: &'static str,
    /// Document ID, when the document had one.
    pub id: Option<String>,
    /// What was wrong with it.
    pub reason: String,
}

impl ConversionError {
    fn new(kind: &'static str, id: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.map(ToOwned::to_owned),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Field Helpers
// =============================================================================

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(
    kind: &'static str,
    id: Option<&str>,
    field: &str,
    value: Option<String>,
) -> Result<String, ConversionError> {
    non_blank(value).ok_or_else(|| ConversionError::new(kind, id, format!("missing {field}")))
}

fn slug_of(slug: Option<RawSlug>) -> Option<String> {
    non_blank(slug.and_then(|s| s.current))
}

/// Convert a JSON number into a two-place decimal price.
fn decimal_price(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok().map(|d| d.round_dp(2))
}

/// Floor a JSON number at zero and truncate it to an integer count.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn non_negative_count(value: Option<f64>) -> u32 {
    value
        .filter(|v| v.is_finite())
        .map_or(0, |v| v.clamp(0.0, f64::from(u32::MAX)) as u32)
}

/// Parse enumerated studio values, dropping unknown ones.
fn parse_known<T: FromStr + Ord>(kind: &'static str, id: &str, values: Option<Vec<String>>) -> Vec<T> {
    let mut parsed: Vec<T> = Vec::new();
    for value in values.unwrap_or_default() {
        match value.parse::<T>() {
            Ok(v) if !parsed.contains(&v) => parsed.push(v),
            Ok(_) => {}
            Err(_) => warn!(kind, id, value = %value, "Dropping unknown enumerated value"),
        }
    }
    parsed
}

// =============================================================================
// Image Conversions
// =============================================================================

pub(crate) fn convert_image(raw: RawImage) -> Image {
    Image {
        asset: raw.asset.map(|asset| ImageAsset {
            id: non_blank(asset.id).map(AssetId::new),
            reference: non_blank(asset.reference),
            url: non_blank(asset.url),
            dimensions: asset
                .metadata
                .and_then(|m| m.dimensions)
                .map(|d| ImageDimensions {
                    width: d.width,
                    height: d.height,
                }),
        }),
    }
}

fn convert_images(raw: Option<Vec<RawImage>>) -> Vec<Image> {
    raw.unwrap_or_default().into_iter().map(convert_image).collect()
}

// =============================================================================
// Product Conversions
// =============================================================================

fn convert_collection_ref(raw: RawCollectionRef) -> Option<CollectionRef> {
    Some(CollectionRef {
        id: CollectionId::new(non_blank(raw.id)?),
        title: non_blank(raw.title).unwrap_or_default(),
        slug: slug_of(raw.slug)?,
    })
}

/// Convert and validate a product document.
///
/// # Errors
///
/// Returns `ConversionError` when the ID, title, slug, or category is
/// missing, or the price is missing or not strictly positive.
pub fn convert_product(raw: RawProduct) -> Result<Product, ConversionError> {
    const KIND: &str = "product";

    let id = required(KIND, None, "_id", raw.id)?;
    let title = required(KIND, Some(&id), "title", raw.title)?;
    let slug = slug_of(raw.slug).ok_or_else(|| ConversionError::new(KIND, Some(&id), "missing slug"))?;

    let price = raw
        .price
        .and_then(decimal_price)
        .map(Price::usd)
        .ok_or_else(|| ConversionError::new(KIND, Some(&id), "missing price"))?;
    if !price.is_positive() {
        return Err(ConversionError::new(
            KIND,
            Some(&id),
            format!("price must be positive, got {}", price.amount),
        ));
    }

    let category = raw
        .category
        .as_deref()
        .ok_or_else(|| ConversionError::new(KIND, Some(&id), "missing category"))?
        .parse::<ProductCategory>()
        .map_err(|e| ConversionError::new(KIND, Some(&id), format!("category: {e}")))?;

    let tags: BTreeSet<String> = raw
        .tags
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let sizes: Vec<Size> = parse_known(KIND, &id, raw.sizes);
    let colors: Vec<Color> = parse_known(KIND, &id, raw.colors);

    Ok(Product {
        title,
        subtitle: non_blank(raw.subtitle),
        slug,
        description: non_blank(raw.description),
        price,
        original_price: raw
            .original_price
            .and_then(decimal_price)
            .map(Price::usd)
            .filter(Price::is_positive),
        category,
        tags,
        rating: raw
            .rating
            .filter(|r| r.is_finite())
            .map_or(0.0, |r| r.clamp(0.0, 5.0)),
        is_new: raw.is_new.unwrap_or(false),
        is_sale: raw.is_sale.unwrap_or(false),
        featured: raw.featured.unwrap_or(false),
        main_image: raw.main_image.map(convert_image).unwrap_or_default(),
        images: convert_images(raw.images),
        sizes,
        colors,
        stock: non_negative_count(raw.stock),
        weight: raw.weight.filter(|w| w.is_finite() && *w >= 0.0),
        dimensions: raw.dimensions.map(|d| Dimensions {
            length: d.length,
            width: d.width,
            height: d.height,
        }),
        materials: raw
            .materials
            .unwrap_or_default()
            .into_iter()
            .filter(|m| !m.trim().is_empty())
            .collect(),
        care: non_blank(raw.care),
        collection: raw.collection.and_then(convert_collection_ref),
        id: ProductId::new(id),
    })
}

// =============================================================================
// Collection Conversions
// =============================================================================

/// Convert and validate a collection document.
///
/// # Errors
///
/// Returns `ConversionError` when the ID, title, slug, or category is missing.
pub fn convert_collection(raw: RawCollection) -> Result<Collection, ConversionError> {
    const KIND: &str = "collection";

    let id = required(KIND, None, "_id", raw.id)?;
    let title = required(KIND, Some(&id), "title", raw.title)?;
    let slug = slug_of(raw.slug).ok_or_else(|| ConversionError::new(KIND, Some(&id), "missing slug"))?;
    let category = raw
        .category
        .as_deref()
        .ok_or_else(|| ConversionError::new(KIND, Some(&id), "missing category"))?
        .parse::<CollectionCategory>()
        .map_err(|e| ConversionError::new(KIND, Some(&id), format!("category: {e}")))?;

    Ok(Collection {
        title,
        subtitle: non_blank(raw.subtitle),
        slug,
        description: non_blank(raw.description),
        category,
        image: raw.image.map(convert_image).unwrap_or_default(),
        images: convert_images(raw.images),
        is_new: raw.is_new.unwrap_or(false),
        featured: raw.featured.unwrap_or(false),
        item_count: non_negative_count(raw.item_count),
        content: raw.content.filter(|c| !c.is_null()),
        id: CollectionId::new(id),
    })
}

// =============================================================================
// Post Conversions
// =============================================================================

/// Flatten a post body to plain text.
///
/// Plain strings pass through. Portable Text blocks contribute the text of
/// their spans, one paragraph per block.
fn post_content(value: Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(Some(s)),
        Value::Array(blocks) => {
            let paragraphs: Vec<String> = blocks
                .iter()
                .filter_map(|block| block.get("children")?.as_array())
                .map(|spans| {
                    spans
                        .iter()
                        .filter_map(|span| span.get("text")?.as_str())
                        .collect::<String>()
                })
                .filter(|p| !p.trim().is_empty())
                .collect();
            non_blank(Some(paragraphs.join("\n\n")))
        }
        _ => None,
    }
}

/// Convert and validate a blog post document.
///
/// # Errors
///
/// Returns `ConversionError` when the ID or title is missing, or the
/// creation timestamp is missing or not RFC 3339.
pub fn convert_post(raw: RawPost) -> Result<Post, ConversionError> {
    const KIND: &str = "post";

    let id = required(KIND, None, "_id", raw.id)?;
    let title = required(KIND, Some(&id), "title", raw.title)?;
    let created_at = raw
        .created_at
        .as_deref()
        .ok_or_else(|| ConversionError::new(KIND, Some(&id), "missing _createdAt"))?;
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| ConversionError::new(KIND, Some(&id), format!("_createdAt: {e}")))?
        .with_timezone(&Utc);

    Ok(Post {
        title,
        cover_image: raw.cover_image.map(convert_image),
        excerpt: non_blank(raw.excerpt),
        content: raw.content.and_then(post_content),
        created_at,
        id: PostId::new(id),
    })
}

/// Decode one raw document, reporting type drift as a conversion error.
fn decode<R: DeserializeOwned>(kind: &'static str, doc: Value) -> Result<R, ConversionError> {
    let id = doc.get("_id").and_then(Value::as_str).map(ToOwned::to_owned);
    serde_json::from_value(doc)
        .map_err(|e| ConversionError::new(kind, id.as_deref(), e.to_string()))
}

/// Convert a list, skipping and logging documents that fail validation.
///
/// Each element is decoded on its own, so a single mistyped field drops only
/// the document that carries it.
pub fn convert_all<R: DeserializeOwned, T>(
    kind: &'static str,
    docs: Vec<Value>,
    convert: impl Fn(R) -> Result<T, ConversionError>,
) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match decode(kind, doc).and_then(&convert) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Skipping invalid document");
                None
            }
        })
        .collect()
}
