use thiserror::Error;

/// Error type for password and secret hashing operations.
///
/// Messages never carry the secret or the full encoded hash.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Random source failed: {0}")]
    RandomSourceFailed(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Malformed password hash")]
    MalformedHash,

    #[error("Unsupported argon2 version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid argon2 parameters: {0}")]
    BadParams(String),

    #[error("Invalid base64 in password hash: {0}")]
    BadEncoding(String),
}
