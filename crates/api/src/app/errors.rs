use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::security::SecurityError;
use crate::soap::{self, EnvelopeError, FaultCode, encode_fault};

/// Fault string for every credential failure other than a missing header.
pub const AUTHENTICATION_FAILED: &str =
    "The security token could not be authenticated or authorized";

pub fn envelope_error_to_response(err: EnvelopeError) -> axum::response::Response {
    match err {
        EnvelopeError::VersionMismatch(_) => soap_fault(
            StatusCode::INTERNAL_SERVER_ERROR,
            FaultCode::VersionMismatch,
            err.to_string(),
        ),
        EnvelopeError::Encode(_) => {
            tracing::error!("{err}");
            soap_fault(StatusCode::INTERNAL_SERVER_ERROR, FaultCode::Server, err.to_string())
        }
        EnvelopeError::Xml(_)
        | EnvelopeError::Empty
        | EnvelopeError::DocTypeNotAllowed
        | EnvelopeError::TooDeep(_)
        | EnvelopeError::NotAnEnvelope
        | EnvelopeError::MissingBody => {
            tracing::info!("rejecting invalid message: {err}");
            soap_fault(StatusCode::BAD_REQUEST, FaultCode::Client, err.to_string())
        }
    }
}

pub fn security_error_to_response(err: SecurityError) -> axum::response::Response {
    tracing::warn!("authentication failed: {err}");
    let message = match err {
        SecurityError::MissingSecurityHeader => err.to_string(),
        _ => AUTHENTICATION_FAILED.to_string(),
    };
    soap_fault(StatusCode::INTERNAL_SERVER_ERROR, FaultCode::Client, message)
}

pub fn no_endpoint(payload_name: Option<String>) -> axum::response::Response {
    let message = match payload_name {
        Some(name) => format!("No endpoint mapping found for [{name}]"),
        None => "No endpoint mapping found for empty Body".to_string(),
    };
    tracing::info!("{message}");
    soap_fault(StatusCode::NOT_FOUND, FaultCode::Client, message)
}

pub fn soap_fault(
    status: StatusCode,
    code: FaultCode,
    message: impl Into<String>,
) -> axum::response::Response {
    match encode_fault(code, &message.into()) {
        Ok(body) => (status, [(header::CONTENT_TYPE, soap::CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            tracing::error!("failed to encode fault: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
