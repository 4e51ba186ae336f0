use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token issuer is not accepted")]
    WrongIssuer,

    #[error("Token signing algorithm is not accepted")]
    WrongAlgorithm,

    #[error("Token carries no user identity")]
    ZeroSubject,
}
