//! Request Logging Middleware
//!
//! One structured log line per request plus the HTTP metrics.

use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use axum::{
    body::{Body, HttpBody},
    extract::{ConnectInfo, MatchedPath, Request},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};

use crate::infrastructure::metrics;
use crate::shared::error::LoggedError;

/// Tracing span per request, tagged with the matched route
pub fn create_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl Fn(&Request<Body>) -> tracing::Span + Clone,
> {
    TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let method = req.method().clone();
        let uri = req.uri().clone();
        let matched = req
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_string())
            .unwrap_or_default();
        tracing::info_span!("http", %method, %uri, matched_path = %matched)
    })
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|ip| ip.parse::<IpAddr>().is_ok())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Log every request once it has been answered
pub async fn log_request(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let remote_ip = client_ip(req.headers(), peer);
    let host = header_str(req.headers(), header::HOST);
    let user_agent = header_str(req.headers(), header::USER_AGENT);
    let bytes_in = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    let method = req.method().clone();
    let uri = req.uri().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status();
    let bytes_out = response.body().size_hint().exact().unwrap_or(0);
    let error = response
        .extensions()
        .get::<LoggedError>()
        .map(|e| e.0.clone())
        .unwrap_or_default();

    metrics::record_http_request(method.as_str(), &route, status.as_u16(), elapsed.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            %remote_ip, %host, %method, %uri, %user_agent,
            status = status.as_u16(), %error, bytes_in, bytes_out,
            latency_ms = elapsed.as_millis() as u64,
            "request"
        );
    } else {
        tracing::info!(
            %remote_ip, %host, %method, %uri, %user_agent,
            status = status.as_u16(), %error, bytes_in, bytes_out,
            latency_ms = elapsed.as_millis() as u64,
            "request"
        );
    }

    response
}
