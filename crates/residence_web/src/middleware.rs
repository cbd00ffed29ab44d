//! Request plumbing applied around the router.

use axum::extract::{Query, Request};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, info};
use serde::Deserialize;
use std::time::Instant;

/// Query parameter carrying the real verb of an HTML form submission.
#[derive(Debug, Deserialize)]
struct MethodOverride {
    #[serde(rename = "_method")]
    method: Option<String>,
}

/// Rewrites `POST ...?_method=PUT|DELETE|PATCH` into that method.
///
/// Must run before routing, so it is applied as a request map around the
/// whole router rather than as a router layer.
pub fn method_override(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }

    // An undecodable query simply carries no override.
    let overridden = Query::<MethodOverride>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(query)| query.method)
        .and_then(|value| parse_override(&value));

    if let Some(method) = overridden {
        *req.method_mut() = method;
    }
    req
}

fn parse_override(value: &str) -> Option<Method> {
    match value.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

/// One access-log event per request.
pub async fn log_request(req: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;

    let http_status = response.status();
    // Failed requests already produced an `http_error` event with the cause.
    if http_status.is_server_error() {
        debug!(
            "event=http_request module=web status=error method={} path={} http_status={} duration_ms={}",
            method,
            path,
            http_status.as_u16(),
            started_at.elapsed().as_millis()
        );
    } else {
        info!(
            "event=http_request module=web status=ok method={} path={} http_status={} duration_ms={}",
            method,
            path,
            http_status.as_u16(),
            started_at.elapsed().as_millis()
        );
    }
    response
}
