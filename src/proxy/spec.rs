//! Proxy construction input.

use std::time::Duration;

use crate::registry::ServiceSpec;

/// Everything needed to build the proxy for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseProxySpec {
    /// Routing key the proxy is installed under.
    pub handle: String,

    /// Raw upstream base URLs. Must be non-empty; only the first is dialed.
    pub backends: Vec<String>,

    /// Connect/handshake deadline per backend dial. Zero means the gateway
    /// default applies.
    pub dial_timeout: Duration,
}

impl From<ServiceSpec> for ReverseProxySpec {
    fn from(spec: ServiceSpec) -> Self {
        Self {
            handle: spec.host,
            backends: spec.backends.into_iter().map(|b| b.address).collect(),
            dial_timeout: Duration::from_secs(spec.timeout),
        }
    }
}
