//! UserRepository trait definition.

use palaver_types::error::RepositoryError;
use palaver_types::identity::User;
use uuid::Uuid;

/// Repository trait for OAuth-backed user accounts.
pub trait UserRepository: Send + Sync {
    /// Find a user by provider name and provider-assigned subject id.
    fn find_by_provider(
        &self,
        provider_name: &str,
        provider_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Find a user by internal id.
    fn find_by_id(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Insert a new user.
    fn insert_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Update profile fields and last_login of an existing user.
    fn update_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
