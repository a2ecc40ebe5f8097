//! Booking lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use booking::Booking;
use chrono::{DateTime, Utc};
use common::{BookingId, PetId, ServiceId, UserId};
use serde::Deserialize;

use crate::AppState;
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::response::Envelope;

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub pet_id: uuid::Uuid,
    pub service_id: uuid::Uuid,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub provider_id: uuid::Uuid,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

#[derive(Deserialize)]
pub struct RescheduleRequest {
    pub scheduled_at: DateTime<Utc>,
}

fn parse_booking_id(raw: &str) -> Result<BookingId, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(BookingId::from_uuid)
        .map_err(|e| ApiError::BadRequest(format!("Invalid booking id: {e}")))
}

/// POST /bookings — books a service for the caller's pet.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Envelope<Booking>>), ApiError> {
    let booking = state
        .bookings
        .create(
            actor,
            PetId::from_uuid(req.pet_id),
            ServiceId::from_uuid(req.service_id),
            req.scheduled_at,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(booking, "Booking created")),
    ))
}

/// GET /bookings — lists the caller's bookings, soonest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
) -> Json<Envelope<Vec<Booking>>> {
    let bookings = state.bookings.store().for_user(actor.user_id).await;
    Json(Envelope::ok(bookings))
}

/// GET /bookings/{id} — returns one booking. Owner, assigned provider, or admin.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Booking>>, ApiError> {
    let booking = state
        .bookings
        .store()
        .get(actor, parse_booking_id(&id)?)
        .await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /bookings/{id}/confirm — confirms a booking. Admin only.
#[tracing::instrument(skip(state))]
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Booking>>, ApiError> {
    let booking = state.bookings.confirm(actor, parse_booking_id(&id)?).await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /bookings/{id}/assign — assigns a provider. Admin only.
#[tracing::instrument(skip(state, req))]
pub async fn assign(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<Envelope<Booking>>, ApiError> {
    let booking = state
        .bookings
        .assign_provider(
            actor,
            parse_booking_id(&id)?,
            UserId::from_uuid(req.provider_id),
        )
        .await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /bookings/{id}/cancel — cancels a booking with a reason.
#[tracing::instrument(skip(state, req))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<Envelope<Booking>>, ApiError> {
    let booking = state
        .bookings
        .cancel(actor, parse_booking_id(&id)?, req.reason)
        .await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /bookings/{id}/reschedule — moves a booking to a new slot.
#[tracing::instrument(skip(state, req))]
pub async fn reschedule(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<Envelope<Booking>>, ApiError> {
    let booking = state
        .bookings
        .reschedule(actor, parse_booking_id(&id)?, req.scheduled_at)
        .await?;
    Ok(Json(Envelope::ok(booking)))
}
