//! Cross-cutting request wrappers: logging and CORS.
//!
//! Applied as an ordered chain around the route table — logging outermost,
//! CORS inside it, matching the original registration order.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::AppState;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE";
const ALLOW_HEADERS: &str = "Content-Type";

/// Logs method, URI, status, and elapsed time for every request.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}

/// Applies the configured allow-list. Preflights are answered here and
/// never reach the router.
pub async fn cors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let allowed = allowed_origin(&state.config.allow_origins, origin.as_deref());

    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        if let Some(value) = allowed {
            let headers = response.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            );
        }
        return response;
    }

    let mut response = next.run(req).await;
    if let Some(value) = allowed {
        let wildcard = value == "*";
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        if !wildcard {
            headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
    response
}

/// The `Access-Control-Allow-Origin` value for this request, if any: `*`
/// when the allow-list holds the wildcard, the echoed origin when listed,
/// nothing otherwise.
fn allowed_origin(allow_origins: &[String], origin: Option<&str>) -> Option<HeaderValue> {
    if allow_origins.iter().any(|entry| entry == "*") {
        return Some(HeaderValue::from_static("*"));
    }
    let origin = origin?;
    allow_origins
        .iter()
        .find(|entry| entry.as_str() == origin)
        .and_then(|entry| HeaderValue::from_str(entry).ok())
}
