//! Hop-annotating, timeout-bounded transport.
//!
//! # Responsibilities
//! - Dial backends with a bounded connect timeout
//! - Append this gateway's hop to the Via header of the outgoing request
//!   and of the returned response
//!
//! # Design Decisions
//! - The hop token is "<httpMajor>.<httpMinor> <localHostname>"; failing to
//!   resolve the hostname fails the request, not the proxy

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderValue, VIA};
use axum::http::{Request, Response, Version};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use crate::proxy::ProxyError;

/// Transport for one proxy: a pooled client with the service's dial timeout.
pub struct ViaTransport {
    client: Client<HttpConnector, Body>,
}

impl ViaTransport {
    pub fn new(dial_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(dial_timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }

    /// Dispatch `request` to its (already rewritten) target, annotating the
    /// Via header in both directions.
    pub async fn round_trip(&self, mut request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let hop = via_hop(request.version())?;
        append_via(request.headers_mut(), &hop);

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let (mut parts, body) = response.into_parts();
        append_via(&mut parts.headers, &hop);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Build this gateway's hop annotation for a request of the given version.
pub fn via_hop(version: Version) -> Result<String, ProxyError> {
    let host = hostname::get().map_err(|e| ProxyError::Hostname(e.to_string()))?;
    let hop = format!("{} {}", protocol_version(version), host.to_string_lossy());

    // A hostname outside the visible-ASCII header charset is as fatal as an
    // unresolvable one.
    HeaderValue::from_str(&hop).map_err(|e| ProxyError::Hostname(e.to_string()))?;
    Ok(hop)
}

fn protocol_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}

/// Append `hop` to an existing comma-separated Via header, or set it.
pub fn append_via(headers: &mut HeaderMap, hop: &str) {
    let combined = match headers.get(VIA).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{}, {}", existing, hop),
        _ => hop.to_string(),
    };
    if let Ok(value) = HeaderValue::from_str(&combined) {
        headers.insert(VIA, value);
    }
}
