//! The per-service proxy object.

use axum::body::Body;
use axum::http::{Request, Response};

use crate::proxy::director::Director;
use crate::proxy::transport::ViaTransport;
use crate::proxy::ProxyError;

/// A fully built proxy for one service: target rewrite plus annotated,
/// timeout-bounded dispatch.
///
/// Immutable after construction; replacement happens by swapping the routing
/// table entry, never by mutating a live proxy.
pub struct ReverseProxy {
    handle: String,
    director: Director,
    transport: ViaTransport,
}

impl ReverseProxy {
    pub fn new(handle: String, director: Director, transport: ViaTransport) -> Self {
        Self {
            handle,
            director,
            transport,
        }
    }

    /// Routing key this proxy was built for.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Forward one inbound request to the backend and return its response.
    pub async fn forward(&self, mut request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let target = self.director.rewrite(request.uri())?;
        tracing::debug!(handle = %self.handle, target = %target, "Forwarding request");
        *request.uri_mut() = target;

        self.transport.round_trip(request).await
    }
}
