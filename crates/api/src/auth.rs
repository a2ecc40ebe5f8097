//! Identity extraction from trusted gateway headers.
//!
//! Authentication itself happens upstream; the gateway forwards the
//! authenticated identity as `x-user-id` and `x-role` headers. The core
//! services still run their own authorization checks on the resulting
//! [`Actor`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::{Actor, Role, UserId};

use crate::error::ApiError;

/// The authenticated caller, extracted from request headers.
#[derive(Debug, Clone, Copy)]
pub struct AuthActor(pub Actor);

impl<S: Send + Sync> FromRequestParts<S> for AuthActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthenticated("Missing x-user-id header".to_string()))?;
        let user_id = uuid::Uuid::parse_str(user_id)
            .map(UserId::from_uuid)
            .map_err(|e| ApiError::Unauthenticated(format!("Invalid x-user-id header: {e}")))?;

        let role = match parts.headers.get("x-role").and_then(|v| v.to_str().ok()) {
            None => Role::Customer,
            Some("customer") => Role::Customer,
            Some("provider") => Role::Provider,
            Some("admin") => Role::Admin,
            Some(other) => {
                return Err(ApiError::Unauthenticated(format!(
                    "Unknown role: {other}"
                )));
            }
        };

        Ok(AuthActor(Actor { user_id, role }))
    }
}
