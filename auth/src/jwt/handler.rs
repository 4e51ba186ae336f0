use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;

/// Signed access token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub claims: Claims,
}

impl AccessToken {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

/// JWT token handler for issuing and verifying access tokens.
///
/// Always signs with HS256 and only ever accepts HS256 on verification, so a token
/// declaring any other algorithm is rejected before its signature is looked at.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    lifetime: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `issuer` - Value written to and required in the `iss` claim
    /// * `lifetime` - Access token lifetime
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], issuer: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
            lifetime,
        }
    }

    /// Issue an access token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Numeric user identifier
    ///
    /// # Returns
    /// Signed token and its claims
    ///
    /// # Errors
    /// * `SigningFailed` - Token signing failed
    pub fn issue(&self, user_id: i64) -> Result<AccessToken, JwtError> {
        let claims = Claims::for_user(user_id, &self.issuer, self.lifetime, Utc::now());
        let token = self.encode(&claims)?;

        Ok(AccessToken { token, claims })
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed or lacks a required claim
    /// * `WrongAlgorithm` - Token is not signed with HS256
    /// * `BadSignature` - Signature does not match
    /// * `Expired` - `exp` lies in the past
    /// * `WrongIssuer` - `iss` differs from the configured issuer
    /// * `ZeroSubject` - `user_id` claim is zero
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode(token, true)
    }

    /// Verify a token with every check except expiry.
    ///
    /// Only meant for the refresh flow, where an expired access token is exchanged
    /// for a new pair.
    pub fn verify_ignoring_expiry(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode(token, false)
    }

    fn decode(&self, token: &str, validate_exp: bool) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = validate_exp;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(map_decode_error)?;

        if token_data.claims.user_id == 0 {
            return Err(JwtError::ZeroSubject);
        }

        Ok(token_data.claims)
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> JwtError {
    match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature => JwtError::BadSignature,
        ErrorKind::InvalidIssuer => JwtError::WrongIssuer,
        ErrorKind::InvalidAlgorithm => JwtError::WrongAlgorithm,
        _ => JwtError::Malformed(e.to_string()),
    }
}
