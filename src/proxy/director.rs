//! Outgoing request target rewrite.
//!
//! # Responsibilities
//! - Replace scheme and authority with the backend's
//! - Join the backend's base path with the request path
//! - Merge query strings, backend parameters first
//!
//! # Design Decisions
//! - The backend URL is parsed once at proxy construction
//! - Rewrite failures are per-request errors; they never poison the proxy

use axum::http::uri::Uri;
use url::Url;

use crate::proxy::ProxyError;

/// Rewrites request targets onto a fixed backend.
#[derive(Debug, Clone)]
pub struct Director {
    target: Url,
}

impl Director {
    pub fn new(target: Url) -> Self {
        Self { target }
    }

    /// Produce the absolute URI to dial for an inbound request URI.
    pub fn rewrite(&self, uri: &Uri) -> Result<Uri, ProxyError> {
        let scheme = self.target.scheme();

        let host = self
            .target
            .host_str()
            .ok_or_else(|| ProxyError::InvalidBackend {
                url: self.target.to_string(),
                reason: "missing host".into(),
            })?;
        let authority = match self.target.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let path = join_paths(self.target.path(), uri.path());
        let path_and_query = match merge_queries(self.target.query(), uri.query()) {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        };

        Uri::builder()
            .scheme(scheme)
            .authority(authority.as_str())
            .path_and_query(path_and_query.as_str())
            .build()
            .map_err(|e| ProxyError::InvalidBackend {
                url: self.target.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Join a backend base path and a request path with exactly one slash.
fn join_paths(base: &str, request: &str) -> String {
    match (base.ends_with('/'), request.starts_with('/')) {
        (true, true) => format!("{}{}", base, &request[1..]),
        (false, false) => format!("{}/{}", base, request),
        _ => format!("{}{}", base, request),
    }
}

/// Concatenate query strings, backend parameters first.
fn merge_queries(base: Option<&str>, request: Option<&str>) -> Option<String> {
    match (base, request) {
        (Some(b), Some(r)) if !b.is_empty() && !r.is_empty() => Some(format!("{}&{}", b, r)),
        (Some(b), _) if !b.is_empty() => Some(b.to_string()),
        (_, Some(r)) if !r.is_empty() => Some(r.to_string()),
        _ => None,
    }
}
