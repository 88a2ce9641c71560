//! Cart route handlers.
//!
//! The cart lives in the session as a [`Cart`] snapshot. Each handler
//! restores a [`CartStore`] from it, applies one mutation, and writes the
//! snapshot back only when the mutation changed something.

use axum::{
    Json,
    extract::{Path, State},
};
use carter_chaos_core::{ProductId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{Cart, CartItem, CartStore, OrderSummary};
use crate::config::PricingConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::sanity::{Color, Size};
use crate::state::AppState;

/// Cart line with its computed total.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub line_total: Decimal,
}

/// Cart as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub quantity: u32,
    pub summary: OrderSummary,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, pricing: &PricingConfig) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartLineView {
                    line_total: item.line_total(),
                    item: item.clone(),
                })
                .collect(),
            quantity: cart.quantity(),
            summary: OrderSummary::for_cart(cart, pricing),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Restore the cart from the session, or start an empty one.
async fn load_cart(session: &Session) -> Result<CartStore> {
    let cart: Option<Cart> = session.get(session_keys::CART).await?;
    Ok(CartStore::from_snapshot(cart.unwrap_or_default()))
}

/// Write the cart back to the session.
async fn save_cart(session: &Session, cart: &CartStore) -> Result<()> {
    session.insert(session_keys::CART, cart.snapshot()).await?;
    Ok(())
}

fn respond(state: &AppState, cart: &CartStore) -> Json<CartView> {
    Json(CartView::new(&cart.snapshot(), &state.config().pricing))
}

// =============================================================================
// Request Types
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Product slug.
    pub slug: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub color: Option<Color>,
}

const fn default_quantity() -> u32 {
    1
}

/// Update quantity request body.
///
/// Signed so that zero and negative values can remove the line.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Variant ID for a product and chosen options (e.g., `p1:M:Black`).
fn variant_id(product: &ProductId, size: Option<Size>, color: Option<Color>) -> VariantId {
    let size = size.map_or_else(|| "default".to_string(), |s| s.to_string());
    let color = color.map_or_else(|| "default".to_string(), |c| format!("{c:?}"));
    VariantId::new(format!("{product}:{size}:{color}"))
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
///
/// GET /api/cart
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(respond(&state, &cart))
}

/// Add a product to the cart.
///
/// POST /api/cart/items
///
/// Title, price, and image come from the content store, never the client.
/// A quantity of 0 leaves the cart unchanged.
#[instrument(skip(state, session), fields(slug = %request.slug))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .sanity()
        .get_product_by_slug(&request.slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{}'", request.slug)))?;

    if let Some(size) = request.size
        && !product.sizes.contains(&size)
    {
        return Err(AppError::BadRequest(format!(
            "Size {size} is not available for {}",
            product.title
        )));
    }
    if let Some(color) = request.color
        && !product.colors.contains(&color)
    {
        return Err(AppError::BadRequest(format!(
            "Color {color:?} is not available for {}",
            product.title
        )));
    }
    if request.quantity > product.stock {
        return Err(AppError::BadRequest(format!(
            "Only {} of {} in stock",
            product.stock, product.title
        )));
    }

    let item = CartItem {
        variant_id: variant_id(&product.id, request.size, request.color),
        id: product.id,
        title: product.title,
        quantity: request.quantity,
        price: product.price.amount,
        image: Some(state.sanity().resolve_image_url(Some(&product.main_image))),
        size: request.size,
        color: request.color,
    };
    let product_id = item.id.clone();

    let cart = load_cart(&session).await?;
    if cart.add_item(item) {
        save_cart(&session, &cart).await?;
        add_breadcrumb(
            "cart",
            "Added item to cart",
            Some(&[("product_id", product_id.as_str())]),
        );
    }

    Ok(respond(&state, &cart))
}

/// Set the quantity of every line for a product.
///
/// PATCH /api/cart/items/{id}
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    if cart.update_quantity(&ProductId::new(id), request.quantity) {
        save_cart(&session, &cart).await?;
    }
    Ok(respond(&state, &cart))
}

/// Remove every line for a product.
///
/// DELETE /api/cart/items/{id}
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    if cart.remove_item(&ProductId::new(id)) {
        save_cart(&session, &cart).await?;
    }
    Ok(respond(&state, &cart))
}

/// Empty the cart.
///
/// DELETE /api/cart
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    if cart.clear() {
        save_cart(&session, &cart).await?;
    }
    Ok(respond(&state, &cart))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_id_encodes_options() {
        let id = ProductId::new("p1");
        assert_eq!(
            variant_id(&id, Some(Size::M), Some(Color::Black)).as_str(),
            "p1:M:Black"
        );
        assert_eq!(variant_id(&id, None, None).as_str(), "p1:default:default");
        assert_eq!(
            variant_id(&id, Some(Size::Waist(32)), None).as_str(),
            "p1:32:default"
        );
    }

    #[test]
    fn test_cart_view_includes_line_totals() {
        let mut cart = Cart::new();
        cart.add_item(CartItem {
            id: ProductId::new("1"),
            title: "Tee".to_string(),
            variant_id: VariantId::new("1:default:default"),
            quantity: 2,
            price: Decimal::from(10),
            image: None,
            size: None,
            color: None,
        });

        let view = CartView::new(&cart, &PricingConfig::default());
        assert_eq!(view.quantity, 2);
        assert_eq!(view.items[0].line_total, Decimal::from(20));
        assert_eq!(view.summary.subtotal, Decimal::from(20));

        let json = serde_json::to_value(&view).unwrap_or_default();
        assert_eq!(json["items"][0]["title"], "Tee");
        assert_eq!(json["items"][0]["line_total"], "20");
    }
}
