//! Credential and secret-encryption primitives for the keystore service.
//!
//! - Password and refresh secret hashing (Argon2id)
//! - HS256 access token issuing and verification
//! - AES-CBC encryption of sensitive field values
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{Argon2Params, PasswordHasher};
//!
//! let hasher = PasswordHasher::with_params(Argon2Params {
//!     memory_kib: 1024,
//!     iterations: 1,
//!     ..Argon2Params::default()
//! });
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!", "keystore", Duration::minutes(15));
//! let issued = handler.issue(42).unwrap();
//! let claims = handler.verify(&issued.token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! ```
//!
//! ## Field Encryption
//! ```
//! let key = b"0123456789abcdef0123456789abcdef";
//! let blob = auth::cipher::encrypt(b"4111 1111 1111 1111", key).unwrap();
//! assert_eq!(auth::cipher::decrypt(&blob, key).unwrap(), b"4111 1111 1111 1111");
//! ```

pub mod authenticator;
pub mod cipher;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::AuthenticatorConfig;
pub use authenticator::IssuedTokens;
pub use cipher::CipherError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::Argon2Params;
pub use password::PasswordError;
pub use password::PasswordHasher;
