//! Tracking endpoints: update log, live status, and the SSE event stream.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use booking::BookingStatus;
use common::BookingId;
use futures_util::Stream;
use serde::Deserialize;
use tokio::sync::broadcast;
use tracking::{GeoPoint, LiveStatus, TrackingUpdate};

use crate::AppState;
use crate::auth::AuthActor;
use crate::error::ApiError;
use crate::response::Envelope;

#[derive(Deserialize)]
pub struct PostUpdateRequest {
    pub status: BookingStatus,
    pub message: Option<String>,
    pub location: Option<GeoPoint>,
}

fn parse_booking_id(raw: &str) -> Result<BookingId, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(BookingId::from_uuid)
        .map_err(|e| ApiError::BadRequest(format!("Invalid booking id: {e}")))
}

/// POST /bookings/{id}/tracking — posts a provider status update.
#[tracing::instrument(skip(state, req))]
pub async fn post_update(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
    Json(req): Json<PostUpdateRequest>,
) -> Result<(StatusCode, Json<Envelope<TrackingUpdate>>), ApiError> {
    let update = state
        .tracking
        .post_update(
            actor,
            parse_booking_id(&id)?,
            req.status,
            req.message,
            req.location,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(update))))
}

/// GET /bookings/{id}/tracking — returns the full ordered update log.
///
/// The catch-up read for clients reconnecting after a dropped stream.
#[tracing::instrument(skip(state))]
pub async fn history(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Vec<TrackingUpdate>>>, ApiError> {
    let updates = state.tracking.history(actor, parse_booking_id(&id)?).await?;
    Ok(Json(Envelope::ok(updates)))
}

/// GET /bookings/{id}/tracking/live — returns the progress bar view.
#[tracing::instrument(skip(state))]
pub async fn live_status(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Json<Envelope<LiveStatus>>, ApiError> {
    let live = state
        .tracking
        .live_status(actor, parse_booking_id(&id)?)
        .await?;
    Ok(Json(Envelope::ok(live)))
}

/// GET /bookings/{id}/tracking/stream — streams live updates over SSE.
///
/// Only events posted after the stream opens are delivered; a subscriber
/// that falls behind the channel buffer silently skips to the newest
/// events and should re-read the history.
#[tracing::instrument(skip(state))]
pub async fn stream(
    State(state): State<Arc<AppState>>,
    AuthActor(actor): AuthActor,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let rx = state
        .tracking
        .subscribe(actor, parse_booking_id(&id)?)
        .await?;

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(update) => {
                    let event = Event::default().event("tracking").json_data(&update);
                    return Some((event, rx));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagged behind");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
