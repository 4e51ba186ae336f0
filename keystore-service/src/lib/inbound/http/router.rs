use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::credential::ports::CredentialServicePort;
use crate::domain::sensitive::SensitiveFieldCipher;

#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<dyn CredentialServicePort>,
    pub field_cipher: Arc<SensitiveFieldCipher>,
}

/// Build the HTTP application.
///
/// # Arguments
/// * `state` - Shared services
/// * `protected_routes` - Object routes of the embedding application; every request to
///   them passes the auth gate and carries an `AuthenticatedUser` extension
pub fn create_router(state: AppState, protected_routes: Router<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/api/user/auth/register", post(register))
        .route("/api/user/auth/login", post(login))
        .route("/api/user/auth/refresh", post(refresh));

    // `layer` rather than `route_layer`: the protected set may be empty.
    let protected_routes = protected_routes.layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    // Header values are left out of the span: they carry access tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
