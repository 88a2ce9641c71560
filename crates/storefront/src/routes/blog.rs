//! Blog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use carter_chaos_core::PostId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use super::products::ImageView;
use crate::error::{AppError, Result};
use crate::sanity::{ImageUrlBuilder, Post, sort_newest_first};
use crate::state::AppState;

/// Post as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: PostId,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    /// Resolved cover image; absent when the post has none.
    pub cover_image: Option<ImageView>,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    #[must_use]
    pub fn new(post: &Post, images: &ImageUrlBuilder) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            cover_image: post
                .cover_image
                .as_ref()
                .map(|image| ImageView::resolve(images, Some(image))),
            created_at: post.created_at,
        }
    }
}

/// List posts, newest first.
///
/// GET /api/posts
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<PostView>>> {
    let mut posts = state.sanity().list_posts().await?;
    sort_newest_first(&mut posts);

    let images = state.sanity().images();
    Ok(Json(posts.iter().map(|p| PostView::new(p, images)).collect()))
}

/// Post detail.
///
/// GET /api/posts/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<PostView>> {
    let post = state
        .sanity()
        .get_post_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post '{id}'")))?;

    Ok(Json(PostView::new(&post, state.sanity().images())))
}
