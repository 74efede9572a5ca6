//! BelGov trace identifiers.
//!
//! Every response gets a fresh `BelGov-Trace-Id`; a trace id sent by the
//! caller is returned as `BelGov-Related-Trace-Id`.

use axum::body::Body;
use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info_span, Instrument};
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "belgov-trace-id";
pub const RELATED_TRACE_ID_HEADER: &str = "belgov-related-trace-id";

/// Middleware that tags the request span and the response with a trace id.
pub async fn trace_id_middleware(req: Request<Body>, next: Next) -> Response {
    let related = req
        .headers()
        .get(TRACE_ID_HEADER)
        .filter(|value| value.to_str().map(|v| !v.trim().is_empty()).unwrap_or(false))
        .cloned();
    let trace_id = Uuid::new_v4().to_string();

    let span = info_span!("request", trace_id = %trace_id);
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
    }
    if let Some(value) = related {
        response
            .headers_mut()
            .insert(HeaderName::from_static(RELATED_TRACE_ID_HEADER), value);
    }
    response
}
