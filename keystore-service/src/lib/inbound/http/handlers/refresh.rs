use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenPairResponseData;
use crate::domain::credential::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

/// Not behind the auth gate: the access token here is usually already expired.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<ApiSuccess<TokenPairResponseData>, ApiError> {
    state
        .credential_service
        .refresh(&body.token, &body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair.into()))
}

/// HTTP request body for token refresh (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    token: String,
    refresh_token: String,
}
