//! Routing-table synchronization loop.
//!
//! # Responsibilities
//! - Consume service updates emitted by the subscriber
//! - Install each one into the gateway

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::gateway::server::Gateway;
use crate::observability::metrics;
use crate::proxy::ReverseProxySpec;
use crate::registry::ServiceSpec;

/// Feed `gateway` from the subscriber's output until the channel closes.
///
/// A spec the creator rejects is logged and skipped so one malformed
/// service cannot halt updates for the others.
pub async fn run_sync(gateway: Arc<Gateway>, mut updates: mpsc::Receiver<ServiceSpec>) {
    while let Some(spec) = updates.recv().await {
        let host = spec.host.clone();
        match gateway.add_service(ReverseProxySpec::from(spec)) {
            Ok(()) => metrics::record_sync_update(),
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "Rejected service update");
            }
        }
    }
    tracing::info!("Service update channel closed, sync loop exiting");
}
