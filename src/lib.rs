//! Host-routing API gateway with registry-backed service discovery.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────┐
//!                         │                 GATEWAY                    │
//!                         │                                            │
//!    Client Request       │  ┌─────────┐   ┌─────────────┐             │
//!    ─────────────────────┼─▶│ gateway │──▶│   routing   │             │
//!                         │  │ server  │   │   table     │             │
//!                         │  └─────────┘   └──────┬──────┘             │
//!                         │                       │                    │
//!                         │                       ▼                    │
//!    Client Response      │               ┌──────────────┐             │
//!    ◀────────────────────┼───────────────│ proxy engine │◀────────────┼──── Backend
//!                         │               │ (Via, dial   │             │
//!                         │               │  timeout)    │             │
//!                         │               └──────────────┘             │
//!                         │                       ▲                    │
//!                         │  ┌─────────┐   ┌──────┴──────┐             │
//!    Registry ────────────┼─▶│subscriber│─▶│  sync loop  │             │
//!    (publish/unpublish)  │  │watch/diff│   └────────────┘             │
//!                         │  └─────────┘                               │
//!                         │                                            │
//!                         │  config · lifecycle · observability        │
//!                         └────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod gateway;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod registry;

pub use config::GatewayConfig;
pub use gateway::Gateway;
pub use lifecycle::Shutdown;
