//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use commerce::CartView;
use common::ProductId;
use serde::Deserialize;

use crate::AppState;
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::response::Envelope;

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

/// GET /cart — returns the caller's cart.
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Json<Envelope<CartView>> {
    let cart = state.carts.get_cart(actor.user_id).await;
    Json(Envelope::ok(cart))
}

/// POST /cart/items — adds a product to the caller's cart.
#[tracing::instrument(skip(state, req))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<Envelope<CartView>>, ApiError> {
    let cart = state
        .carts
        .add_item(actor.user_id, ProductId::new(req.product_id), req.quantity)
        .await?;
    Ok(Json(Envelope::ok(cart)))
}

/// PUT /cart/items/{sku} — sets a line's quantity; zero removes the line.
#[tracing::instrument(skip(state, req))]
pub async fn set_quantity(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(sku): Path<String>,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<Envelope<CartView>>, ApiError> {
    let cart = state
        .carts
        .set_quantity(actor.user_id, ProductId::new(sku), req.quantity)
        .await?;
    Ok(Json(Envelope::ok(cart)))
}
