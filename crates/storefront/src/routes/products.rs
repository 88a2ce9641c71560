//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use carter_chaos_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::sanity::{
    Color, CollectionRef, Dimensions, Image, ImageUrlBuilder, Product, ProductCategory, Size,
};
use crate::state::AppState;

/// Image with its resolved URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageView {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl ImageView {
    /// Resolve an image; absent images become the placeholder.
    #[must_use]
    pub fn resolve(images: &ImageUrlBuilder, image: Option<&Image>) -> Self {
        let dimensions = image
            .and_then(|i| i.asset.as_ref())
            .and_then(|a| a.dimensions);
        Self {
            url: images.resolve(image),
            width: dimensions.map(|d| d.width),
            height: dimensions.map(|d| d.height),
        }
    }
}

/// Product as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub price: Price,
    /// Formatted price (e.g., "$19.99").
    pub price_display: String,
    pub original_price: Option<Price>,
    pub category: ProductCategory,
    pub tags: Vec<String>,
    pub rating: f64,
    pub is_new: bool,
    pub is_sale: bool,
    pub featured: bool,
    pub in_stock: bool,
    pub stock: u32,
    pub main_image: ImageView,
    pub images: Vec<ImageView>,
    pub sizes: Vec<Size>,
    pub colors: Vec<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care: Option<String>,
    pub collection: Option<CollectionRef>,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, images: &ImageUrlBuilder) -> Self {
        Self {
            id: product.id.clone(),
            slug: product.slug.clone(),
            title: product.title.clone(),
            subtitle: product.subtitle.clone(),
            description: product.description.clone(),
            price: product.price,
            price_display: product.price.display(),
            original_price: product.original_price,
            category: product.category,
            tags: product.tags.iter().cloned().collect(),
            rating: product.rating,
            is_new: product.is_new,
            is_sale: product.is_sale,
            featured: product.featured,
            in_stock: product.in_stock(),
            stock: product.stock,
            main_image: ImageView::resolve(images, Some(&product.main_image)),
            images: product
                .images
                .iter()
                .map(|image| ImageView::resolve(images, Some(image)))
                .collect(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            weight: product.weight,
            dimensions: product.dimensions,
            materials: product.materials.clone(),
            care: product.care.clone(),
            collection: product.collection.clone(),
        }
    }

    /// Convert a list of products.
    #[must_use]
    pub fn list(products: &[Product], images: &ImageUrlBuilder) -> Vec<Self> {
        products.iter().map(|p| Self::new(p, images)).collect()
    }
}

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Only products flagged as featured.
    #[serde(default)]
    pub featured: bool,
}

/// List products.
///
/// GET /api/products[?featured=true]
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let sanity = state.sanity();
    let products = if query.featured {
        sanity.list_featured_products().await?
    } else {
        sanity.list_products().await?
    };

    Ok(Json(ProductView::list(&products, sanity.images())))
}

/// Product detail.
///
/// GET /api/products/{slug}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductView>> {
    let product = state
        .sanity()
        .get_product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;

    Ok(Json(ProductView::new(&product, state.sanity().images())))
}
