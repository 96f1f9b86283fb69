//! Gateway serving path and lifecycle.
//!
//! # Responsibilities
//! - Own the routing table and the injected proxy creator
//! - Install / remove services
//! - Serve inbound requests: extract routing key, dispatch to the proxy
//! - Start/stop the listener with graceful drain
//!
//! # Design Decisions
//! - `start` returns as soon as the listener is bound; serving continues on
//!   a background task
//! - `stop` is non-idempotent: true on the first stop, false afterwards

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::gateway::table::{routing_key, RoutingTable};
use crate::gateway::GatewayError;
use crate::observability::metrics;
use crate::proxy::{ProxyCreator, ProxyError, ReverseProxySpec};

/// Fixed response body for unregistered hosts.
const NOT_FOUND_BODY: &str = r#"{"error":"not_found","error_description":"The requested resource could not be found but may be available again in the future."}"#;

/// Application state injected into the request handler.
#[derive(Clone)]
struct GatewayState {
    table: Arc<RoutingTable>,
}

struct RunningServer {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), std::io::Error>>,
}

/// The gateway: routing table, proxy creator, and HTTP server lifecycle.
pub struct Gateway {
    table: Arc<RoutingTable>,
    creator: Arc<dyn ProxyCreator>,
    bind_address: String,
    server: Mutex<Option<RunningServer>>,
}

impl Gateway {
    pub fn new(bind_address: impl Into<String>, creator: Arc<dyn ProxyCreator>) -> Self {
        Self {
            table: Arc::new(RoutingTable::new()),
            creator,
            bind_address: bind_address.into(),
            server: Mutex::new(None),
        }
    }

    /// Build the proxy for `spec` and install it under its handle.
    ///
    /// Insert-or-replace: a proxy already installed for the handle is fully
    /// superseded. On a failed build the table is left untouched.
    pub fn add_service(&self, spec: ReverseProxySpec) -> Result<(), ProxyError> {
        let handle = spec.handle.clone();
        let proxy = self.creator.create(spec)?;
        self.table.insert(&handle, Arc::new(proxy));
        metrics::set_service_count(self.table.len());
        tracing::info!(host = %handle, services = self.table.len(), "Service installed");
        Ok(())
    }

    /// Remove the service for `host`; errors when none is installed.
    pub fn remove_service(&self, host: &str) -> Result<(), GatewayError> {
        if !self.table.remove(host) {
            return Err(GatewayError::NotFound(host.to_string()));
        }
        metrics::set_service_count(self.table.len());
        tracing::info!(host = %host, services = self.table.len(), "Service removed");
        Ok(())
    }

    pub fn service_count(&self) -> usize {
        self.table.len()
    }

    /// Bind the configured address and start serving on a background task.
    ///
    /// Returns once the listener is bound; bind failures are synchronous.
    pub async fn start(&self) -> Result<SocketAddr, GatewayError> {
        let mut server = self.server.lock().await;
        if server.is_some() {
            return Err(GatewayError::AlreadyRunning);
        }

        let listener = TcpListener::bind(&self.bind_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(address = %local_addr, "Gateway listening");

        let app = build_router(GatewayState {
            table: self.table.clone(),
        });

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        *server = Some(RunningServer {
            shutdown_tx,
            handle,
        });
        Ok(local_addr)
    }

    /// Graceful shutdown: stop accepting, drain in-flight requests, join the
    /// serve task. True on the first successful stop, false when already
    /// stopped (or never started).
    pub async fn stop(&self) -> bool {
        let running = match self.server.lock().await.take() {
            Some(running) => running,
            None => return false,
        };

        let _ = running.shutdown_tx.send(());
        if let Err(e) = running.handle.await {
            tracing::error!(error = %e, "Gateway serve task ended abnormally");
        }
        tracing::info!("Gateway stopped");
        true
    }
}

fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/{*path}", any(route_request))
        .route("/", any(route_request))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Route one inbound request by its Host header.
async fn route_request(State(state): State<GatewayState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().host())
        .unwrap_or_default();
    let key = routing_key(host).to_string();

    let Some(proxy) = state.table.lookup(&key) else {
        tracing::debug!(host = %key, "No service for host");
        metrics::record_request(&method, StatusCode::NOT_FOUND.as_u16(), start);
        return not_found_response();
    };

    match proxy.forward(request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), start);
            response
        }
        Err(e) => {
            tracing::error!(host = %key, error = %e, "Upstream round trip failed");
            metrics::record_request(&method, StatusCode::BAD_GATEWAY.as_u16(), start);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "application/json")],
        NOT_FOUND_BODY,
    )
        .into_response()
}
