//! Credential lifecycle and sensitive-field encryption for the keystore backend.
//!
//! The bundled binary serves only the public `/api/user/auth/*` routes. Object handlers
//! (accounts, bank cards, notes) belong to the embedding application: it passes them to
//! [`inbound::http::router::create_router`] as the protected set, where every request
//! passes the auth gate and reads [`domain::sensitive::SensitiveFieldCipher`] from
//! [`inbound::http::router::AppState`] to seal fields before persisting them.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::credential;
pub use outbound::repositories;
