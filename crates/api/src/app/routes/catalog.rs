use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Extension,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;

use crate::app::dto::{self, CatalogOperation};
use crate::app::{AppState, errors};
use crate::security;
use crate::soap::{self, EnvelopeError};

/// `POST /ws`: parse, map to an endpoint, authenticate, handle, encode.
pub async fn dispatch(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> axum::response::Response {
    let body = match std::str::from_utf8(&body) {
        Ok(body) => body,
        Err(e) => return errors::envelope_error_to_response(EnvelopeError::Xml(e.to_string())),
    };

    let envelope = match soap::parse_envelope(body) {
        Ok(envelope) => envelope,
        Err(e) => return errors::envelope_error_to_response(e),
    };

    let payload = envelope.payload();
    let Some(operation) = payload.and_then(CatalogOperation::from_payload) else {
        return errors::no_endpoint(payload.map(|p| p.qualified_name()));
    };

    let principal = match security::authenticate_envelope(
        &envelope,
        state.verifier.as_ref(),
        &state.token_policy,
        Utc::now(),
    ) {
        Ok(principal) => principal,
        Err(e) => return errors::security_error_to_response(e),
    };
    tracing::debug!(user = %principal, operation = operation.name(), "authenticated");

    let encoded = match operation {
        CatalogOperation::GetBook(request) => {
            dto::encode_get_book_response(&state.handler.handle_get_book(request))
        }
        CatalogOperation::SearchBooks(request) => {
            dto::encode_search_books_response(&state.handler.handle_search_books(request))
        }
    };

    match encoded {
        Ok(xml) => (StatusCode::OK, [(header::CONTENT_TYPE, soap::CONTENT_TYPE)], xml).into_response(),
        Err(e) => errors::envelope_error_to_response(e),
    }
}
