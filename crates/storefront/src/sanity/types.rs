//! Domain types for Sanity content.
//!
//! These types provide a clean, validated API separate from the raw
//! documents returned by the query endpoint (see `documents`).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use carter_chaos_core::{AssetId, CollectionId, PostId, Price, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Image Types
// =============================================================================

/// Pixel dimensions reported by the asset metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: f64,
    pub height: f64,
}

/// The asset behind an image field.
///
/// Dereferenced assets (`asset->{...}`) carry an ID and URL; bare references
/// only carry the opaque `_ref` string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Asset document ID (e.g., `image-abc123-800x600-jpg`).
    pub id: Option<AssetId>,
    /// Opaque asset reference string.
    pub reference: Option<String>,
    /// Direct CDN URL when the asset was dereferenced.
    pub url: Option<String>,
    /// Pixel dimensions when metadata was projected.
    pub dimensions: Option<ImageDimensions>,
}

/// An image field. An image without an asset resolves to the placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub asset: Option<ImageAsset>,
}

// =============================================================================
// Category Types
// =============================================================================

/// Product category as configured in the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "t-shirts")]
    TShirts,
    #[serde(rename = "hoodies")]
    Hoodies,
    #[serde(rename = "pants")]
    Pants,
    #[serde(rename = "jackets")]
    Jackets,
    #[serde(rename = "shoes")]
    Shoes,
    #[serde(rename = "accessories")]
    Accessories,
}

impl ProductCategory {
    /// Studio value for the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TShirts => "t-shirts",
            Self::Hoodies => "hoodies",
            Self::Pants => "pants",
            Self::Jackets => "jackets",
            Self::Shoes => "shoes",
            Self::Accessories => "accessories",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t-shirts" => Ok(Self::TShirts),
            "hoodies" => Ok(Self::Hoodies),
            "pants" => Ok(Self::Pants),
            "jackets" => Ok(Self::Jackets),
            "shoes" => Ok(Self::Shoes),
            "accessories" => Ok(Self::Accessories),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Collection category as configured in the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionCategory {
    /// "Statement Pieces"
    Statement,
    /// "Essentials"
    Basics,
    /// "Limited Edition"
    Exclusive,
}

impl FromStr for CollectionCategory {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "statement" => Ok(Self::Statement),
            "basics" => Ok(Self::Basics),
            "exclusive" => Ok(Self::Exclusive),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// A string that is not one of the enumerated studio values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownValue(pub String);

// =============================================================================
// Size and Color
// =============================================================================

/// Available product size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
    /// Waist size in inches (28-44, even numbers).
    Waist(u8),
}

impl FromStr for Size {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XS" => Ok(Self::XS),
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            "XL" => Ok(Self::XL),
            "XXL" => Ok(Self::XXL),
            other => match other.parse::<u8>() {
                Ok(waist) if (28..=44).contains(&waist) && waist % 2 == 0 => {
                    Ok(Self::Waist(waist))
                }
                _ => Err(UnknownValue(other.to_string())),
            },
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XS => f.write_str("XS"),
            Self::S => f.write_str("S"),
            Self::M => f.write_str("M"),
            Self::L => f.write_str("L"),
            Self::XL => f.write_str("XL"),
            Self::XXL => f.write_str("XXL"),
            Self::Waist(w) => write!(f, "{w}"),
        }
    }
}

impl TryFrom<String> for Size {
    type Error = UnknownValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.to_string()
    }
}

/// Available product color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
    Orange,
    Brown,
    Gray,
    Navy,
}

impl FromStr for Color {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Black" => Ok(Self::Black),
            "White" => Ok(Self::White),
            "Red" => Ok(Self::Red),
            "Blue" => Ok(Self::Blue),
            "Green" => Ok(Self::Green),
            "Yellow" => Ok(Self::Yellow),
            "Purple" => Ok(Self::Purple),
            "Pink" => Ok(Self::Pink),
            "Orange" => Ok(Self::Orange),
            "Brown" => Ok(Self::Brown),
            "Gray" => Ok(Self::Gray),
            "Navy" => Ok(Self::Navy),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// Physical dimensions in centimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Reference from a product to its collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: CollectionId,
    pub title: String,
    pub slug: String,
}

/// A product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub subtitle: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    /// Always strictly positive.
    pub price: Price,
    /// Pre-sale price shown struck through.
    pub original_price: Option<Price>,
    pub category: ProductCategory,
    pub tags: BTreeSet<String>,
    /// Average rating clamped to 0-5.
    pub rating: f64,
    pub is_new: bool,
    pub is_sale: bool,
    pub featured: bool,
    pub main_image: Image,
    pub images: Vec<Image>,
    pub sizes: Vec<Size>,
    pub colors: Vec<Color>,
    pub stock: u32,
    /// Weight in grams.
    pub weight: Option<f64>,
    pub dimensions: Option<Dimensions>,
    pub materials: Vec<String>,
    pub care: Option<String>,
    pub collection: Option<CollectionRef>,
}

impl Product {
    /// Whether at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Collection Types
// =============================================================================

/// A curated product collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    pub subtitle: Option<String>,
    pub slug: String,
    pub description: Option<String>,
    pub category: CollectionCategory,
    /// Featured image.
    pub image: Image,
    pub images: Vec<Image>,
    pub is_new: bool,
    pub featured: bool,
    /// Approximate number of items, as entered in the studio.
    pub item_count: u32,
    /// Portable Text body, passed through untouched.
    pub content: Option<serde_json::Value>,
}

// =============================================================================
// Blog Types
// =============================================================================

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub cover_image: Option<Image>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sort posts newest first, breaking ties by ID for a stable order.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
