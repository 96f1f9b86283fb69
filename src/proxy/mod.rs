//! Reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! ReverseProxySpec (from a published ServiceSpec)
//!     → creator.rs (validate, resolve dial timeout)
//!     → engine.rs (ReverseProxy: director + transport)
//!
//! Per request:
//!     director.rs (rewrite target to backends[0])
//!     → transport.rs (Via hop annotation, timeout-bounded dial)
//!     → backend round trip
//!     → transport.rs (Via hop annotation on the response)
//! ```
//!
//! # Design Decisions
//! - Proxies are built whole and swapped into the routing table; they are
//!   never mutated in place while requests may hold them
//! - Only the first backend of a spec is dialed; the rest are inert

pub mod creator;
pub mod director;
pub mod engine;
pub mod spec;
pub mod transport;

use thiserror::Error;

pub use creator::{HttpProxyCreator, ProxyCreator};
pub use engine::ReverseProxy;
pub use spec::ReverseProxySpec;

/// Errors raised while building a proxy or forwarding through it.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Backends cannot be empty.")]
    EmptyBackends,

    #[error("invalid backend url {url}: {reason}")]
    InvalidBackend { url: String, reason: String },

    #[error("failed to resolve local hostname: {0}")]
    Hostname(String),

    #[error("upstream round trip failed: {0}")]
    Upstream(String),
}
