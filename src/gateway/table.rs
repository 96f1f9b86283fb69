//! Concurrent host → proxy table.
//!
//! # Responsibilities
//! - Extract the routing key from an inbound Host value
//! - Map routing keys to installed proxies
//!
//! # Design Decisions
//! - Host keys are case-insensitive (per HTTP spec)
//! - Lookups return a cloned Arc so no lock outlives the call
//! - Entries live until an explicit remove; the sync path never purges

use std::sync::Arc;

use dashmap::DashMap;

use crate::proxy::ReverseProxy;

/// The gateway's routing table.
#[derive(Default)]
pub struct RoutingTable {
    services: DashMap<String, Arc<ReverseProxy>>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-replace. New requests see the new proxy immediately;
    /// requests already dispatched on the old one finish undisturbed.
    pub fn insert(&self, host: &str, proxy: Arc<ReverseProxy>) {
        self.services.insert(host.to_lowercase(), proxy);
    }

    /// Returns false when the host was not present.
    pub fn remove(&self, host: &str) -> bool {
        self.services.remove(&host.to_lowercase()).is_some()
    }

    pub fn lookup(&self, host: &str) -> Option<Arc<ReverseProxy>> {
        self.services.get(&host.to_lowercase()).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Extract the routing key from a Host header value.
///
/// Any `:port` suffix is trimmed. A host of more than two dot-separated
/// labels routes by its leftmost label (fixed subdomain convention);
/// anything shorter routes by the full name.
pub fn routing_key(host: &str) -> &str {
    let host = host.split(':').next().unwrap_or(host);
    if host.split('.').count() > 2 {
        host.split('.').next().unwrap_or(host)
    } else {
        host
    }
}
