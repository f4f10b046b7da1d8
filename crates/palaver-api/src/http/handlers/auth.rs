//! Authentication handlers: Google login and session introspection.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use palaver_types::identity::User;

use crate::http::error::AppError;
use crate::http::extractors::TokenUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    /// Google OAuth access token obtained by the client.
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/google - Exchange a Google access token for a session token.
///
/// Upserts the user from the provider profile and issues a signed JWT whose
/// subject is the user id.
pub async fn google_login(
    State(state): State<AppState>,
    Json(body): Json<GoogleLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .identity_service
        .login_with_google(&body.token)
        .await?;

    let token = state
        .tokens
        .issue(&user.id)
        .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;

    Ok(Json(LoginResponse { token, user }))
}

/// GET /api/auth/me - The account behind the presented bearer token.
pub async fn me(
    State(state): State<AppState>,
    TokenUser(user_id): TokenUser,
) -> Result<Json<User>, AppError> {
    let user = state.identity_service.get_user(&user_id).await?;
    Ok(Json(user))
}
