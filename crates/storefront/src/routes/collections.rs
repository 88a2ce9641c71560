//! Collection route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use carter_chaos_core::CollectionId;
use serde::Serialize;
use tracing::instrument;

use super::products::{ImageView, ProductView};
use crate::error::{AppError, Result};
use crate::sanity::{Collection, CollectionCategory, ImageUrlBuilder};
use crate::state::AppState;

/// Collection as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionView {
    pub id: CollectionId,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: CollectionCategory,
    pub image: ImageView,
    pub images: Vec<ImageView>,
    pub is_new: bool,
    pub featured: bool,
    pub item_count: u32,
    /// Portable Text body, only on the detail endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl CollectionView {
    #[must_use]
    pub fn new(collection: &Collection, images: &ImageUrlBuilder) -> Self {
        Self {
            id: collection.id.clone(),
            slug: collection.slug.clone(),
            title: collection.title.clone(),
            subtitle: collection.subtitle.clone(),
            description: collection.description.clone(),
            category: collection.category,
            image: ImageView::resolve(images, Some(&collection.image)),
            images: collection
                .images
                .iter()
                .map(|image| ImageView::resolve(images, Some(image)))
                .collect(),
            is_new: collection.is_new,
            featured: collection.featured,
            item_count: collection.item_count,
            content: collection.content.clone(),
        }
    }
}

/// List collections.
///
/// GET /api/collections
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CollectionView>>> {
    let collections = state.sanity().list_collections().await?;
    let images = state.sanity().images();

    Ok(Json(
        collections
            .iter()
            .map(|c| CollectionView::new(c, images))
            .collect(),
    ))
}

/// Collection detail.
///
/// GET /api/collections/{slug}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CollectionView>> {
    let collection = state
        .sanity()
        .get_collection_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("collection '{slug}'")))?;

    Ok(Json(CollectionView::new(
        &collection,
        state.sanity().images(),
    )))
}

/// Products in a collection.
///
/// GET /api/collections/{slug}/products
///
/// An unknown slug yields an empty list rather than 404; the collection
/// itself is not looked up.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ProductView>>> {
    let products = state
        .sanity()
        .list_products_by_collection_slug(&slug)
        .await?;

    Ok(Json(ProductView::list(&products, state.sanity().images())))
}
