use thiserror::Error;

/// Error type for symmetric field encryption.
///
/// Never carries key material or plaintext.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("Invalid key length: expected 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Ciphertext too short")]
    CiphertextTooShort,

    #[error("Ciphertext is not a multiple of the block size")]
    InvalidBlockLength,

    #[error("Invalid padding")]
    InvalidPadding,

    #[error("Random source failed: {0}")]
    RandomSourceFailed(String),
}
