use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;

/// Run each request inside a span carrying a fresh correlation id.
pub async fn request_span(req: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        request_id = %globalbooks_observability::tracing::request_id(),
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let response = next.run(req).await;
        tracing::info!(status = response.status().as_u16(), "request finished");
        response
    }
    .instrument(span)
    .await
}
