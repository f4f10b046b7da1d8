//! Traits for external collaborators.
//!
//! The avatar and quote services are best-effort by contract: their
//! implementations degrade to a fixed placeholder/fallback internally, so
//! callers always get a usable value and never a failure. Only the userinfo
//! exchange can fail, because an invalid provider token must surface as 401.

use palaver_types::error::AuthError;
use palaver_types::identity::UserProfile;

/// Fetches a fresh avatar image URL for a new chat.
pub trait AvatarFetcher: Send + Sync {
    /// Always yields a URL; implementations fall back to a placeholder.
    fn fetch_avatar(&self) -> impl std::future::Future<Output = String> + Send;
}

/// Fetches the text of a simulated bot reply.
pub trait QuoteFetcher: Send + Sync {
    /// Always yields reply text; implementations fall back to a fixed string.
    fn fetch_quote(&self) -> impl std::future::Future<Output = String> + Send;
}

/// Exchanges a provider access token for the caller's profile.
pub trait UserInfoFetcher: Send + Sync {
    fn fetch_profile(
        &self,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile, AuthError>> + Send;
}
