use async_trait::async_trait;

use crate::domain::credential::errors::CredentialError;
use crate::domain::credential::errors::RepositoryError;
use crate::domain::credential::models::Credentials;
use crate::domain::credential::models::RefreshTokenRecord;
use crate::domain::credential::models::TokenPair;
use crate::domain::credential::models::User;
use crate::domain::credential::models::UserId;
use crate::domain::credential::models::Username;

/// Port for credential lifecycle operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Create a user and issue their first token pair.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Fresh token pair
    ///
    /// # Errors
    /// * `HashingFailed` - Password could not be hashed
    /// * `UsernameTaken` - Username is already registered
    /// * `StoreFailed` - User or refresh record could not be stored
    /// * `SigningFailed` / `RandomSourceFailed` - Token pair could not be issued
    async fn register(&self, credentials: Credentials) -> Result<TokenPair, CredentialError>;

    /// Check a password and issue a new token pair.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Fresh token pair
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this username
    /// * `PasswordMismatch` - Password is wrong
    /// * `VerifyFailed` - Stored hash could not be checked
    /// * `StoreFailed` - Store lookup or write failed
    async fn login(&self, credentials: Credentials) -> Result<TokenPair, CredentialError>;

    /// Resolve the user behind an access token.
    ///
    /// # Errors
    /// * `TokenNotValid` - Any verification failure
    fn authenticate(&self, access_token: &str) -> Result<UserId, CredentialError>;

    /// Exchange an access token (expired or not) and the current refresh secret for a new pair.
    ///
    /// # Arguments
    /// * `access_token` - Access token previously issued to the user
    /// * `refresh_token` - Plaintext refresh secret issued with it
    ///
    /// # Returns
    /// New token pair; the presented refresh secret stops working
    ///
    /// # Errors
    /// * `TokenNotValid` - Access token fails verification
    /// * `StoreLookupFailed` - Refresh record could not be loaded
    /// * `RefreshTokenNotFound` - User has no refresh record
    /// * `TokenRevoked` - Refresh record is revoked
    /// * `RefreshTokenExpired` - Refresh record is past its expiry
    /// * `RefreshTokenMismatch` - Secret does not match, or a concurrent refresh won
    /// * `VerifyFailed` - Stored hash could not be checked
    /// * `StoreFailed` - New record could not be stored
    async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, CredentialError>;
}

/// Persistence operations for users and their refresh records.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Persist a new user; the store assigns the identifier.
    ///
    /// # Errors
    /// * `UniqueViolation` - Username is already taken
    /// * `Database` - Database operation failed
    async fn create_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    /// Retrieve user by username (exact, case-sensitive match).
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError>;

    /// Retrieve the refresh record of a user.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_refresh_token(
        &self,
        user_id: UserId,
    ) -> Result<Option<RefreshTokenRecord>, RepositoryError>;

    /// Insert or overwrite the refresh record of a user.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn save_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), RepositoryError>;

    /// Overwrite the refresh record only if it still holds `expected_hash` and is not revoked.
    ///
    /// # Returns
    /// `false` when no record matched
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn replace_refresh_token(
        &self,
        expected_hash: &str,
        record: &RefreshTokenRecord,
    ) -> Result<bool, RepositoryError>;
}
