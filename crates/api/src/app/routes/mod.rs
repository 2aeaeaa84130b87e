use axum::{
    Router,
    routing::{get, post},
};

pub mod catalog;
pub mod system;
pub mod wsdl;

/// SOAP endpoint and its WSDL.
pub fn router() -> Router {
    Router::new()
        .route("/ws", post(catalog::dispatch))
        .route("/ws/catalog.wsdl", get(wsdl::catalog_wsdl))
}
