//! Authenticated user types.
//!
//! Users exist only for OAuth-backed sessions; guest sessions are a bare
//! owner-id string and never touch the users table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account created from an OAuth provider login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Subject id assigned by the provider (`sub` claim for Google).
    pub provider_id: String,
    /// Provider discriminator, currently `google` or `facebook`.
    pub provider_name: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: String,
    pub last_login: DateTime<Utc>,
}

/// Profile fields returned by a provider's userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub provider_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: String,
}
