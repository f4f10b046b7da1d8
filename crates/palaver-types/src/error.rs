use thiserror::Error;

/// Errors from repository operations (used by trait definitions in palaver-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors related to chat operations.
///
/// `NotFound` deliberately covers both a missing chat and a chat owned by
/// someone else; callers cannot distinguish the two.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors related to message operations.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message not found")]
    NotFound,

    /// The parent chat is missing or not owned by the caller.
    #[error("chat not found")]
    ChatNotFound,

    /// The message is not the caller's own user-sent message.
    #[error("you can only edit your own messages")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors related to identity and token verification.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication required")]
    MissingCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("user not found")]
    UserNotFound,

    /// The OAuth provider rejected the supplied access token.
    #[error("invalid or expired provider access token")]
    ProviderRejected,

    #[error("provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
