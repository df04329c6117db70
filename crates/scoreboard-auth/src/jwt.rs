//! Issuing and decoding signed tokens.
//!
//! Tokens are HS512 JWTs whose payload is [`Claims`]. Decoding checks the
//! signature and the expiry; anything else about the user (verification,
//! role) is left to the authorization gate.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use scoreboard_config::JwtConfig;
use scoreboard_core::AppError;

use crate::claims::{AuthenticatedUser, Claims};

/// Signs `user` into a token that expires after `jwt_config.token_expiry` seconds.
pub fn issue_token(user: &AuthenticatedUser, jwt_config: &JwtConfig) -> Result<String, AppError> {
    issue_token_with_ttl(user, jwt_config.token_expiry, jwt_config)
}

pub fn issue_token_with_ttl(
    user: &AuthenticatedUser,
    ttl_seconds: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        data: user.clone(),
        exp: (now + ttl_seconds).max(0) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Decodes a token and returns the user it identifies.
///
/// # Errors
///
/// Returns an authentication error if the signature is invalid, the token
/// has expired, or the payload is malformed.
pub fn decode_token(token: &str, jwt_config: &JwtConfig) -> Result<AuthenticatedUser, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::new(Algorithm::HS512),
    )
    .map(|data| data.claims.data)
    .map_err(|_| AppError::authentication_required())
}
