//! Product and service listing endpoints, plus the admin restock hook.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use catalog::{ProductRecord, ServiceRecord};
use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::response::Envelope;

/// GET /products — lists the product catalog.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Json<Envelope<Vec<ProductRecord>>> {
    let mut products = state.ledger.all().await;
    products.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    Json(Envelope::ok(products))
}

/// GET /services — lists bookable services.
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Json<Envelope<Vec<ServiceRecord>>> {
    let mut services = state.services.all().await;
    services.sort_by(|a, b| a.name.cmp(&b.name));
    Json(Envelope::ok(services))
}

#[derive(Deserialize)]
pub struct RestockRequest {
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct RestockResponse {
    pub sku: ProductId,
    pub stock: u32,
}

/// POST /admin/products/{sku}/restock — adds stock to a product. Admin only.
#[tracing::instrument(skip(state, req))]
pub async fn restock(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(sku): Path<String>,
    Json(req): Json<RestockRequest>,
) -> Result<Json<Envelope<RestockResponse>>, ApiError> {
    if !actor.is_admin() {
        return Err(ApiError::Forbidden(
            "Only admins can restock products".to_string(),
        ));
    }
    let sku = ProductId::new(sku);
    let stock = state.ledger.restock(&sku, req.quantity).await?;
    Ok(Json(Envelope::ok(RestockResponse { sku, stock })))
}
