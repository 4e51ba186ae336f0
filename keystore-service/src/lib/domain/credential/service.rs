use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::credential::errors::CredentialError;
use crate::domain::credential::errors::RepositoryError;
use crate::domain::credential::models::Credentials;
use crate::domain::credential::models::RefreshTokenRecord;
use crate::domain::credential::models::TokenPair;
use crate::domain::credential::models::UserId;
use crate::domain::credential::ports::CredentialRepository;
use crate::domain::credential::ports::CredentialServicePort;

/// Domain service implementation for the credential lifecycle.
///
/// Per user the refresh record moves `NoRecord -> Active` on register or login and
/// `Active -> Active` on refresh. Expired and revoked records are rejected, never produced.
pub struct CredentialService<R>
where
    R: CredentialRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
}

impl<R> CredentialService<R>
where
    R: CredentialRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Hashing and token issuing
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn issue_and_store(&self, user_id: UserId) -> Result<TokenPair, CredentialError> {
        let issued = self.authenticator.issue_tokens(user_id.0)?;

        let record = RefreshTokenRecord {
            user_id,
            refresh_token_hash: issued.refresh_token_hash,
            refresh_token_expires_at: issued.refresh_token_expires_at,
            revoked_at: None,
        };

        self.repository
            .save_refresh_token(&record)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Failed to store refresh token");
                CredentialError::StoreFailed(format!("saving refresh token of user {}: {}", user_id, e))
            })?;

        Ok(TokenPair {
            user_id,
            access_token: issued.access_token,
            access_token_expires_at: issued.access_token_expires_at,
            refresh_token: issued.refresh_token,
            refresh_token_expires_at: record.refresh_token_expires_at,
        })
    }
}

#[async_trait]
impl<R> CredentialServicePort for CredentialService<R>
where
    R: CredentialRepository,
{
    async fn register(&self, credentials: Credentials) -> Result<TokenPair, CredentialError> {
        let password_hash = self
            .authenticator
            .hash_password(&credentials.password)
            .map_err(|e| CredentialError::HashingFailed(e.to_string()))?;

        let user = self
            .repository
            .create_user(&credentials.username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::UniqueViolation(_) => {
                    CredentialError::UsernameTaken(credentials.username.to_string())
                }
                RepositoryError::Database(msg) => {
                    CredentialError::StoreFailed(format!("creating user: {}", msg))
                }
            })?;

        let pair = self.issue_and_store(user.id).await?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(pair)
    }

    async fn login(&self, credentials: Credentials) -> Result<TokenPair, CredentialError> {
        let user = self
            .repository
            .find_by_username(&credentials.username)
            .await
            .map_err(|e| CredentialError::StoreFailed(format!("looking up user: {}", e)))?
            .ok_or(CredentialError::UserNotFound)?;

        let matched = self
            .authenticator
            .verify_password(&credentials.password, &user.password_hash)
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                CredentialError::VerifyFailed(e.to_string())
            })?;

        if !matched {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(CredentialError::PasswordMismatch);
        }

        let pair = self.issue_and_store(user.id).await?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(pair)
    }

    fn authenticate(&self, access_token: &str) -> Result<UserId, CredentialError> {
        self.authenticator
            .validate_token(access_token)
            .map(|claims| UserId(claims.user_id))
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                CredentialError::TokenNotValid
            })
    }

    async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, CredentialError> {
        let claims = self
            .authenticator
            .validate_token_for_refresh(access_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected for refresh");
                CredentialError::TokenNotValid
            })?;
        let user_id = UserId(claims.user_id);

        let record = self
            .repository
            .find_refresh_token(user_id)
            .await
            .map_err(|e| {
                CredentialError::StoreLookupFailed(format!(
                    "loading refresh token of user {}: {}",
                    user_id, e
                ))
            })?
            .ok_or(CredentialError::RefreshTokenNotFound)?;

        if record.is_revoked() {
            tracing::warn!(user_id = %user_id, "Refresh attempted with revoked token");
            return Err(CredentialError::TokenRevoked);
        }

        if record.is_expired(Utc::now()) {
            return Err(CredentialError::RefreshTokenExpired);
        }

        let matched = self
            .authenticator
            .verify_refresh_token(refresh_token, &record.refresh_token_hash)
            .map_err(|e| CredentialError::VerifyFailed(e.to_string()))?;

        if !matched {
            tracing::warn!(user_id = %user_id, "Refresh token mismatch");
            return Err(CredentialError::RefreshTokenMismatch);
        }

        let issued = self.authenticator.issue_tokens(user_id.0)?;
        let rotated = RefreshTokenRecord {
            user_id,
            refresh_token_hash: issued.refresh_token_hash,
            refresh_token_expires_at: issued.refresh_token_expires_at,
            revoked_at: None,
        };

        let replaced = self
            .repository
            .replace_refresh_token(&record.refresh_token_hash, &rotated)
            .await
            .map_err(|e| {
                CredentialError::StoreFailed(format!(
                    "rotating refresh token of user {}: {}",
                    user_id, e
                ))
            })?;

        // Another refresh consumed the same secret first.
        if !replaced {
            tracing::warn!(user_id = %user_id, "Concurrent refresh lost the race");
            return Err(CredentialError::RefreshTokenMismatch);
        }

        tracing::info!(user_id = %user_id, "Token pair refreshed");

        Ok(TokenPair {
            user_id,
            access_token: issued.access_token,
            access_token_expires_at: issued.access_token_expires_at,
            refresh_token: issued.refresh_token,
            refresh_token_expires_at: rotated.refresh_token_expires_at,
        })
    }
}
