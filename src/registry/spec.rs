//! Published service schema.
//!
//! This is the wire format stored in the registry. Durations are integer
//! seconds.

use serde::{Deserialize, Serialize};

/// A service published to the registry, keyed by its host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceSpec {
    /// Virtual host the service answers for. Unique registry key.
    pub host: String,

    #[serde(default)]
    pub disabled: bool,

    /// Dial timeout for the service's backends, in seconds. Zero means the
    /// gateway default applies.
    #[serde(default)]
    pub timeout: u64,

    #[serde(default)]
    pub backends: Vec<BackendInfo>,
}

/// One upstream origin for a service.
///
/// Only the first backend of a spec is ever dialed; the heartbeat fields are
/// carried for publishers but not interpreted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendInfo {
    /// Upstream base URL, e.g. "http://10.0.0.7:3000".
    pub address: String,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default)]
    pub heart_beat_address: String,

    #[serde(default)]
    pub heart_beat_timeout: u64,
}
