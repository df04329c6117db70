//! Token decoding and the authorization gate.
//!
//! The token stage never rejects a request: a missing, malformed, expired or
//! forged credential simply leaves the caller anonymous. Endpoints that need
//! a caller reject anonymous requests in [`authorize`].

use axum::http::HeaderMap;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;

use scoreboard_auth::{AuthenticatedUser, decode_token};
use scoreboard_config::JwtConfig;
use scoreboard_core::AppError;

use crate::middleware::role::UserCheck;

/// Reads an optional `Authorization: Bearer <token>` header.
pub fn decode_credential(headers: &HeaderMap, jwt_config: &JwtConfig) -> Option<AuthenticatedUser> {
    let Authorization(bearer) = headers.typed_get::<Authorization<Bearer>>()?;

    match decode_token(bearer.token(), jwt_config) {
        Ok(user) => Some(user),
        Err(err) => {
            debug!(error = %err, "Ignoring undecodable bearer token");
            None
        }
    }
}

/// Applies the authentication, verification and eligibility policies, in
/// that order. A no-op for endpoints that do not require authentication.
pub async fn authorize(
    auth_required: bool,
    user: Option<&AuthenticatedUser>,
    check: &dyn UserCheck,
) -> Result<(), AppError> {
    if !auth_required {
        return Ok(());
    }

    let user = user.ok_or_else(AppError::authentication_required)?;

    if !user.verified {
        return Err(AppError::user_not_verified());
    }

    if !check.allows(user).await {
        return Err(AppError::invalid_user());
    }

    Ok(())
}
