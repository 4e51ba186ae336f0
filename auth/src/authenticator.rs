use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::Argon2Params;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::generate_refresh_secret;

/// Settings for building an [`Authenticator`].
#[derive(Clone)]
pub struct AuthenticatorConfig {
    pub jwt_secret: Vec<u8>,
    pub issuer: String,
    pub access_token_lifetime: Duration,
    pub refresh_token_lifetime: Duration,
    /// Number of random bytes in a refresh secret
    pub refresh_token_length: usize,
    pub hasher_params: Argon2Params,
}

impl fmt::Debug for AuthenticatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatorConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_token_lifetime", &self.access_token_lifetime)
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .field("refresh_token_length", &self.refresh_token_length)
            .field("hasher_params", &self.hasher_params)
            .finish()
    }
}

/// Authentication coordinator combining password hashing, JWT handling and
/// refresh secret generation.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    refresh_token_lifetime: Duration,
    refresh_token_length: usize,
}

/// Freshly issued access/refresh pair.
///
/// `refresh_token` is the only copy of the plaintext secret; `refresh_token_hash`
/// is what gets persisted.
#[derive(Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_hash: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedTokens")
            .field("access_token_expires_at", &self.access_token_expires_at)
            .field("refresh_token_expires_at", &self.refresh_token_expires_at)
            .finish_non_exhaustive()
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Random source failed: {0}")]
    RandomSourceFailed(String),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Signing secret, issuer, lifetimes and hashing costs
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(config: AuthenticatorConfig) -> Self {
        Self {
            password_hasher: PasswordHasher::with_params(config.hasher_params),
            jwt_handler: JwtHandler::new(
                &config.jwt_secret,
                config.issuer,
                config.access_token_lifetime,
            ),
            refresh_token_lifetime: config.refresh_token_lifetime,
            refresh_token_length: config.refresh_token_length,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against its stored hash.
    ///
    /// # Returns
    /// `true` when the password matches
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash could not be parsed or recomputed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Issue a new access token and refresh secret for a user.
    ///
    /// # Arguments
    /// * `user_id` - Numeric user identifier
    ///
    /// # Returns
    /// Token pair with the hash of the refresh secret and both expiries
    ///
    /// # Errors
    /// * `Jwt` - Access token signing failed
    /// * `RandomSourceFailed` - Refresh secret could not be generated
    /// * `Password` - Refresh secret could not be hashed
    pub fn issue_tokens(&self, user_id: i64) -> Result<IssuedTokens, AuthenticationError> {
        let access = self.jwt_handler.issue(user_id)?;

        let refresh_token = generate_refresh_secret(self.refresh_token_length)
            .map_err(|e| AuthenticationError::RandomSourceFailed(e.to_string()))?;
        let refresh_token_hash = self.password_hasher.hash(&refresh_token)?;
        let refresh_token_expires_at = Utc::now() + self.refresh_token_lifetime;

        Ok(IssuedTokens {
            access_token_expires_at: access.expires_at(),
            access_token: access.token,
            refresh_token,
            refresh_token_hash,
            refresh_token_expires_at,
        })
    }

    /// Validate an access token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }

    /// Validate an access token presented for refresh; expiry is not checked.
    ///
    /// # Errors
    /// * `JwtError` - Signature, algorithm, issuer or subject check failed
    pub fn validate_token_for_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify_ignoring_expiry(token)
    }

    /// Check a presented refresh secret against the stored hash in constant time.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash could not be parsed or recomputed
    pub fn verify_refresh_token(
        &self,
        refresh_token: &str,
        stored_hash: &str,
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(refresh_token, stored_hash)
    }
}
