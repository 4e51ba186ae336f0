use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error reported by the credential store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Top-level error for credential lifecycle operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Token is not valid")]
    TokenNotValid,

    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Refresh token has expired")]
    RefreshTokenExpired,

    #[error("Refresh token does not match")]
    RefreshTokenMismatch,

    // Infrastructure errors
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Hash verification failed: {0}")]
    VerifyFailed(String),

    #[error("Token signing failed: {0}")]
    SigningFailed(String),

    #[error("Random source failed: {0}")]
    RandomSourceFailed(String),

    #[error("Failed to look up stored credentials: {0}")]
    StoreLookupFailed(String),

    #[error("Failed to store credentials: {0}")]
    StoreFailed(String),
}

impl From<auth::AuthenticationError> for CredentialError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::Password(e) => CredentialError::HashingFailed(e.to_string()),
            auth::AuthenticationError::Jwt(e) => CredentialError::SigningFailed(e.to_string()),
            auth::AuthenticationError::RandomSourceFailed(e) => {
                CredentialError::RandomSourceFailed(e)
            }
        }
    }
}
