//! Gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (Host header)
//!     → table.rs (routing key extraction, host → proxy lookup)
//!     → proxy::engine (forward to the backend)
//!     → response to client
//!
//! Registry updates:
//!     subscriber channel
//!     → sync.rs (convert spec, install via server.rs)
//!     → table.rs (atomic insert-or-replace)
//! ```
//!
//! # Design Decisions
//! - The host table is the only state shared between the serving path and
//!   the sync path; lookups clone the Arc out and never hold a lock across
//!   the backend round trip
//! - Proxies are installed build-then-swap; a failed build leaves the table
//!   untouched
//! - One bad service update is logged and skipped, never halts the loop

pub mod server;
pub mod sync;
pub mod table;

use thiserror::Error;

pub use server::Gateway;
pub use sync::run_sync;
pub use table::RoutingTable;

/// Errors surfaced by gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no service registered for host {0}")]
    NotFound(String),

    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),

    #[error("gateway is already running")]
    AlreadyRunning,
}
