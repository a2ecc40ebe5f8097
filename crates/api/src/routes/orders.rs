//! Checkout and order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use commerce::{Address, Order, PaymentMethod};
use common::OrderId;
use serde::Deserialize;

use crate::AppState;
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::response::Envelope;

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: Address,
    /// Defaults to the shipping address when omitted.
    pub billing_address: Option<Address>,
    pub payment_method: PaymentMethod,
}

fn parse_order_id(raw: &str) -> Result<OrderId, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(OrderId::from_uuid)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))
}

/// POST /orders — converts the caller's cart into an order.
#[tracing::instrument(skip(state, req))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Envelope<Order>>), ApiError> {
    let billing = req.billing_address.unwrap_or_else(|| req.shipping_address.clone());
    let order = state
        .checkout
        .place_order(actor.user_id, req.shipping_address, billing, req.payment_method)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(order, "Order placed")),
    ))
}

/// GET /orders — lists the caller's orders, newest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Json<Envelope<Vec<Order>>> {
    let orders = state.orders.for_user(actor.user_id).await;
    Json(Envelope::ok(orders))
}

/// GET /orders/{id} — returns one order. Owner or admin.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Order>>, ApiError> {
    let order = state.orders.get(actor, parse_order_id(&id)?).await?;
    Ok(Json(Envelope::ok(order)))
}

/// POST /orders/{id}/ship — marks an order shipped. Admin only.
#[tracing::instrument(skip(state))]
pub async fn ship(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Order>>, ApiError> {
    let order = state.orders.mark_shipped(actor, parse_order_id(&id)?).await?;
    Ok(Json(Envelope::ok(order)))
}

/// POST /orders/{id}/deliver — marks an order delivered. Admin only.
#[tracing::instrument(skip(state))]
pub async fn deliver(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Order>>, ApiError> {
    let order = state
        .orders
        .mark_delivered(actor, parse_order_id(&id)?)
        .await?;
    Ok(Json(Envelope::ok(order)))
}

/// POST /orders/{id}/cancel — cancels an unshipped order. Owner or admin.
#[tracing::instrument(skip(state))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Order>>, ApiError> {
    let order = state.orders.cancel(actor, parse_order_id(&id)?).await?;
    Ok(Json(Envelope::ok(order)))
}
