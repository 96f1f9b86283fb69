//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → broadcast to subscriber loop, sync loop, gateway
//!     → each task drains and exits → join
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: watch loop first, then the serving path drains
//! - Background tasks are joined, never leaked

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
