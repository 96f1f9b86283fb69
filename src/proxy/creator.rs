//! Proxy construction.
//!
//! # Responsibilities
//! - Validate a ReverseProxySpec
//! - Resolve the effective dial timeout
//! - Assemble director and transport into a ReverseProxy

use std::time::Duration;

use url::Url;

use crate::proxy::director::Director;
use crate::proxy::engine::ReverseProxy;
use crate::proxy::spec::ReverseProxySpec;
use crate::proxy::transport::ViaTransport;
use crate::proxy::ProxyError;

/// Builds proxies from specs. Injected into the gateway so tests can
/// substitute their own implementation.
pub trait ProxyCreator: Send + Sync {
    fn create(&self, spec: ReverseProxySpec) -> Result<ReverseProxy, ProxyError>;
}

/// Production creator.
pub struct HttpProxyCreator {
    default_dial_timeout: Duration,
}

impl HttpProxyCreator {
    pub fn new(default_dial_timeout: Duration) -> Self {
        Self {
            default_dial_timeout,
        }
    }
}

impl Default for HttpProxyCreator {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl ProxyCreator for HttpProxyCreator {
    fn create(&self, spec: ReverseProxySpec) -> Result<ReverseProxy, ProxyError> {
        let first = spec.backends.first().ok_or(ProxyError::EmptyBackends)?;

        // Only backends[0] is ever dialed; the rest of the list is inert.
        let target = Url::parse(first).map_err(|e| ProxyError::InvalidBackend {
            url: first.clone(),
            reason: e.to_string(),
        })?;

        let dial_timeout = if spec.dial_timeout.is_zero() {
            self.default_dial_timeout
        } else {
            spec.dial_timeout
        };

        Ok(ReverseProxy::new(
            spec.handle,
            Director::new(target),
            ViaTransport::new(dial_timeout),
        ))
    }
}
