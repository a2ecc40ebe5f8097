//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use booking::BookingError;
use catalog::CatalogError;
use commerce::{CartError, CheckoutError, OrderError};
use tracking::TrackingError;

use crate::response::Envelope;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed identity headers.
    Unauthenticated(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Authenticated but not allowed.
    Forbidden(String),
    /// Cart operation failure.
    Cart(CartError),
    /// Checkout failure.
    Checkout(CheckoutError),
    /// Order operation failure.
    Order(OrderError),
    /// Booking lifecycle failure.
    Booking(BookingError),
    /// Catalog lookup failure.
    Catalog(CatalogError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Cart(err) => cart_error_to_response(err),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Order(err) => order_error_to_response(err),
            ApiError::Booking(err) => booking_error_to_response(err),
            ApiError::Catalog(err) => catalog_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, axum::Json(Envelope::<()>::failure(message))).into_response()
    }
}

fn catalog_error_to_response(err: CatalogError) -> (StatusCode, String) {
    let status = match &err {
        CatalogError::ProductNotFound(_) | CatalogError::ServiceNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        CatalogError::ProductUnavailable(_) | CatalogError::ServiceUnavailable(_) => {
            StatusCode::BAD_REQUEST
        }
        // A lost race on stock is a conflict: retry or read fresh state.
        CatalogError::InsufficientStock { .. } => StatusCode::CONFLICT,
    };
    (status, err.to_string())
}

fn cart_error_to_response(err: CartError) -> (StatusCode, String) {
    match err {
        CartError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        CartError::LineNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        CartError::Catalog(inner) => catalog_error_to_response(inner),
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match err {
        CheckoutError::EmptyCart => (StatusCode::BAD_REQUEST, err.to_string()),
        CheckoutError::Catalog(inner) => catalog_error_to_response(inner),
    }
}

fn order_error_to_response(err: OrderError) -> (StatusCode, String) {
    let status = match &err {
        OrderError::NotFound(_) => StatusCode::NOT_FOUND,
        OrderError::InvalidStatusChange { .. } => StatusCode::CONFLICT,
        OrderError::Unauthorized(_) => StatusCode::FORBIDDEN,
    };
    (status, err.to_string())
}

fn booking_error_to_response(err: BookingError) -> (StatusCode, String) {
    match err {
        BookingError::Catalog(inner) => catalog_error_to_response(inner),
        err @ BookingError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        err @ BookingError::InvalidTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
        err @ BookingError::CancellationWindowExpired { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        err @ BookingError::Unauthorized(_) => (StatusCode::FORBIDDEN, err.to_string()),
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::Order(err)
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

impl From<TrackingError> for ApiError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::Booking(inner) => ApiError::Booking(inner),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}
