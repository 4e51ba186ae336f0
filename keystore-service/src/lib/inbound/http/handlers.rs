use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::domain::credential::errors::CredentialError;
use crate::domain::credential::errors::UsernameError;
use crate::domain::credential::models::Credentials;
use crate::domain::credential::models::TokenPair;
use crate::domain::credential::models::Username;

pub mod login;
pub mod refresh;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::UsernameTaken(_) => ApiError::Conflict(err.to_string()),
            CredentialError::PasswordMismatch
            | CredentialError::TokenNotValid
            | CredentialError::RefreshTokenMismatch
            | CredentialError::RefreshTokenExpired => ApiError::Unauthorized(err.to_string()),
            CredentialError::TokenRevoked | CredentialError::UserNotFound => {
                ApiError::Forbidden(err.to_string())
            }
            CredentialError::RefreshTokenNotFound => ApiError::BadRequest(err.to_string()),
            CredentialError::HashingFailed(_)
            | CredentialError::VerifyFailed(_)
            | CredentialError::SigningFailed(_)
            | CredentialError::RandomSourceFailed(_)
            | CredentialError::StoreLookupFailed(_)
            | CredentialError::StoreFailed(_) => {
                tracing::error!(error = %err, "Credential operation failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// HTTP request body for register and login (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialsRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCredentialsRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Password must not be empty")]
    EmptyPassword,
}

impl CredentialsRequest {
    fn try_into_credentials(self) -> Result<Credentials, ParseCredentialsRequestError> {
        let username = Username::new(self.username)?;
        if self.password.is_empty() {
            return Err(ParseCredentialsRequestError::EmptyPassword);
        }
        Ok(Credentials::new(username, self.password))
    }
}

impl From<ParseCredentialsRequestError> for ApiError {
    fn from(err: ParseCredentialsRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPairResponseData {
    pub user_id: i64,
    pub token: String,
    pub token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenPairResponseData {
    fn from(pair: TokenPair) -> Self {
        Self {
            user_id: pair.user_id.0,
            token: pair.access_token,
            token_expires_at: pair.access_token_expires_at,
            refresh_token: pair.refresh_token,
            refresh_token_expires_at: pair.refresh_token_expires_at,
        }
    }
}
