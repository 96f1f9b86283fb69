//! Registry synchronization subsystem.
//!
//! # Data Flow
//! ```text
//! Operator (CLI, admin tooling)
//!     → publisher.rs (serialize ServiceSpec, put at service_prefix + host)
//!     → registry (external key-value store, versioned writes)
//!
//! Registry
//!     → subscriber.rs (long-poll watch, snapshot diff)
//!     → output channel (capacity 1, blocking send)
//!     → gateway sync loop (install proxies)
//! ```
//!
//! # Design Decisions
//! - The registry itself is an external collaborator; only its contract
//!   (client.rs) is consumed here
//! - Watch errors are transient: reset the cursor and retry, never surface
//! - Deletions produce no events; consumers only ever see adds and updates

pub mod client;
pub mod http;
pub mod publisher;
pub mod spec;
pub mod subscriber;

pub use client::{Registry, RegistryEntry, RegistryError};
pub use http::HttpRegistry;
pub use publisher::Publisher;
pub use spec::{BackendInfo, ServiceSpec};
pub use subscriber::Subscriber;
