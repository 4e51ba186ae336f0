use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claims.
///
/// Carries the user identity as a numeric `user_id` claim next to the registered
/// claims. `sub` always holds the same identifier as a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Numeric user identifier
    pub user_id: i64,

    /// Issuer
    pub iss: String,

    /// Subject (stringified user_id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user issued at `now`.
    ///
    /// # Arguments
    /// * `user_id` - Numeric user identifier
    /// * `issuer` - Deployment issuer
    /// * `lifetime` - Time until the token expires
    /// * `now` - Issue instant
    pub fn for_user(user_id: i64, issuer: &str, lifetime: Duration, now: DateTime<Utc>) -> Self {
        let expiration = now + lifetime;

        Self {
            user_id,
            iss: issuer.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = iss.to_string();
        self
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}
