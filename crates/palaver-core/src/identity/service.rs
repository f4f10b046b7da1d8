//! Identity service: provider login (userinfo exchange + upsert) and lookup.
//!
//! Token minting and verification stay in the infra/API layers; this service
//! only maps provider profiles onto user rows.

use chrono::Utc;
use palaver_types::error::AuthError;
use palaver_types::identity::User;
use tracing::info;
use uuid::Uuid;

use crate::identity::repository::UserRepository;
use crate::remote::UserInfoFetcher;

const GOOGLE: &str = "google";

/// OAuth login and user lookup.
pub struct IdentityService<U: UserRepository, P: UserInfoFetcher> {
    users: U,
    profiles: P,
}

impl<U: UserRepository, P: UserInfoFetcher> IdentityService<U, P> {
    pub fn new(users: U, profiles: P) -> Self {
        Self { users, profiles }
    }

    /// Exchange a Google access token for a profile and upsert the user.
    ///
    /// An existing user gets display name, email, and last_login refreshed;
    /// the stored avatar is kept as-is.
    pub async fn login_with_google(&self, access_token: &str) -> Result<User, AuthError> {
        let profile = self.profiles.fetch_profile(access_token).await?;

        match self
            .users
            .find_by_provider(GOOGLE, &profile.provider_id)
            .await?
        {
            Some(mut user) => {
                user.display_name = profile.display_name;
                user.email = profile.email;
                user.last_login = Utc::now();
                self.users.update_user(&user).await?;
                Ok(user)
            }
            None => {
                let user = User {
                    id: Uuid::now_v7(),
                    provider_id: profile.provider_id,
                    provider_name: GOOGLE.to_string(),
                    display_name: profile.display_name,
                    email: profile.email,
                    avatar_url: profile.avatar_url,
                    last_login: Utc::now(),
                };
                self.users.insert_user(&user).await?;
                info!(user_id = %user.id, "User created from Google login");
                Ok(user)
            }
        }
    }

    /// Load a user by id, as resolved from a verified token subject.
    pub async fn get_user(&self, user_id: &Uuid) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
