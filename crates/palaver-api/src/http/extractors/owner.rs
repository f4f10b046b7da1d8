//! Session identity extractors.
//!
//! `Owner` resolves the opaque owner id that scopes every chat and message
//! query. Resolution order:
//!
//! 1. `x-guest-id: <id>` header, taken verbatim. This wins even when a
//!    valid bearer token is also present.
//! 2. `Authorization: Bearer <jwt>`, verified against the signing secret;
//!    the token subject (a user id) becomes the owner id.
//!
//! `TokenUser` accepts only the bearer token path and is used where a real
//! account is required (`/api/auth/me`).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use palaver_types::error::AuthError;

use crate::http::error::AppError;
use crate::state::AppState;

/// The opaque id owning the caller's chats.
pub struct Owner(pub String);

impl FromRequestParts<AppState> for Owner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Guest header takes precedence over any bearer token.
        if let Some(guest) = guest_id(parts)? {
            return Ok(Owner(guest));
        }

        if let Some(token) = bearer_token(parts)? {
            let user_id = state.tokens.verify(&token)?;
            // A token signed for a since-deleted account is as good as forged.
            return match state.identity_service.get_user(&user_id).await {
                Ok(user) => Ok(Owner(user.id.to_string())),
                Err(AuthError::UserNotFound) => Err(AuthError::InvalidToken.into()),
                Err(e) => Err(e.into()),
            };
        }

        Err(AuthError::MissingCredentials.into())
    }
}

/// An authenticated user id resolved from a verified bearer token.
pub struct TokenUser(pub Uuid);

impl FromRequestParts<AppState> for TokenUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(AuthError::MissingCredentials)?;
        let user_id = state.tokens.verify(&token)?;
        Ok(TokenUser(user_id))
    }
}

/// Read a non-empty `x-guest-id` header, if present.
fn guest_id(parts: &Parts) -> Result<Option<String>, AppError> {
    match parts.headers.get("x-guest-id") {
        Some(value) => {
            let id = value
                .to_str()
                .map_err(|_| AppError::Validation("Invalid x-guest-id header encoding".to_string()))?
                .trim();
            if id.is_empty() {
                Ok(None)
            } else {
                Ok(Some(id.to_string()))
            }
        }
        None => Ok(None),
    }
}

/// Read an `Authorization: Bearer <token>` header, if present.
fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    match parts.headers.get("authorization") {
        Some(value) => {
            let auth = value.to_str().map_err(|_| {
                AppError::Validation("Invalid Authorization header encoding".to_string())
            })?;
            Ok(auth
                .strip_prefix("Bearer ")
                .map(|token| token.trim().to_string()))
        }
        None => Ok(None),
    }
}
