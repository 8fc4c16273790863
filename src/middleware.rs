use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::SharedState;

/// Logs one line per request with a generated request id, the resolved
/// client address, and the response status and latency.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = client_ip(&request);
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %request_id,
        method = %method,
        uri = %uri,
        client_ip = %client_ip,
        status = %response.status(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}

/// Counts the request against the client's fixed window before routing.
/// Every response carries the `X-RateLimit-*` headers; denials short-circuit
/// with 429 and a `Retry-After`.
pub async fn rate_limit_middleware(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client_ip = client_ip(&request);
    let decision = state.limiter.check(&client_ip)?;

    if !decision.allowed {
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "Too many requests, please try again later"
            })),
        )
            .into_response();
        response.headers_mut().insert(
            "Retry-After",
            HeaderValue::from(decision.retry_after.as_secs()),
        );
        response
            .headers_mut()
            .insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
        response
            .headers_mut()
            .insert("X-RateLimit-Remaining", HeaderValue::from(0u32));
        return Ok(response);
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
    response
        .headers_mut()
        .insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining));
    Ok(response)
}

/// Resolve the client address: proxy headers first, then the connection
/// peer address.
fn client_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string());

    if let Some(ip) = forwarded.filter(|ip| !ip.is_empty()) {
        return ip;
    }

    if let Some(ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
    {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_header_takes_the_first_hop() {
        let mut request = Request::new(Body::empty());
        request.headers_mut().insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );

        assert_eq!(client_ip(&request), "192.168.1.1");
    }

    #[test]
    fn real_ip_header_is_used_when_no_forwarded_header() {
        let mut request = Request::new(Body::empty());
        request
            .headers_mut()
            .insert("x-real-ip", HeaderValue::from_static("203.0.113.1"));

        assert_eq!(client_ip(&request), "203.0.113.1");
    }

    #[test]
    fn connect_info_is_the_fallback() {
        let mut request = Request::new(Body::empty());
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 9000))));

        assert_eq!(client_ip(&request), "127.0.0.1");
    }

    #[test]
    fn unknown_when_nothing_identifies_the_client() {
        let request = Request::new(Body::empty());
        assert_eq!(client_ip(&request), "unknown");
    }
}
