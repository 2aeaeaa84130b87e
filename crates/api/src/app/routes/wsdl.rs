use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};

use crate::app::AppState;
use crate::soap;

/// WSDL template; the service address is filled in per request.
pub const CATALOG_WSDL: &str = include_str!("../../../resources/catalog.wsdl");

const LOCATION_PLACEHOLDER: &str = "${location}";

/// `GET /ws/catalog.wsdl`, with `soap:address` pointing at the host the
/// client used to reach us.
pub async fn catalog_wsdl(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(&state.advertised_host);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, soap::CONTENT_TYPE)],
        render_wsdl(host),
    )
        .into_response()
}

pub fn render_wsdl(host: &str) -> String {
    let location = format!("http://{host}/ws");
    CATALOG_WSDL.replace(LOCATION_PLACEHOLDER, &quick_xml::escape::escape(location.as_str()))
}
