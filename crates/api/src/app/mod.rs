//! HTTP application wiring (Axum router + catalog wiring).
//!
//! - `routes/`: HTTP routes + handlers (SOAP dispatch, WSDL, health)
//! - `dto.rs`: SOAP payload mapping to and from catalog requests/responses
//! - `errors.rs`: consistent SOAP fault responses

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use globalbooks_auth::{CredentialVerifier, TokenPolicy};
use globalbooks_catalog::{CatalogHandler, CatalogStore};

use crate::config::ServiceConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub handler: CatalogHandler,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub token_policy: TokenPolicy,

    /// Host advertised in the WSDL when a request carries no `Host` header.
    pub advertised_host: String,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: ServiceConfig) -> Router {
    let state = AppState {
        handler: CatalogHandler::new(Arc::new(CatalogStore::seeded())),
        verifier: Arc::new(config.credentials),
        token_policy: config.token_policy,
        advertised_host: advertised_host(config.bind_addr),
    };
    build_router(state)
}

/// Build the router around prepared state (custom catalogs or verifiers).
pub fn build_router(state: AppState) -> Router {
    tracing::info!(books = state.handler.store().len(), "catalog loaded");

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(Arc::new(state)))
        .layer(
            ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_span)),
        )
}

fn advertised_host(bind_addr: SocketAddr) -> String {
    if bind_addr.ip().is_unspecified() {
        format!("localhost:{}", bind_addr.port())
    } else {
        bind_addr.to_string()
    }
}
