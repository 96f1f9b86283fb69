//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Registry connection and watch settings.
    pub registry: RegistryConfig,

    /// Upstream proxying settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Registry connection and watch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the registry HTTP API (e.g., "http://127.0.0.1:8500").
    pub url: String,

    /// Key prefix under which services are published. Keys are formed by
    /// direct concatenation: `service_prefix + host`.
    pub service_prefix: String,

    /// Long-poll wait per watch iteration, in seconds.
    pub poll_wait_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8500".to_string(),
            service_prefix: "services/".to_string(),
            poll_wait_secs: 5,
        }
    }
}

/// Upstream proxying settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Dial timeout applied when a published service does not set one, in
    /// seconds.
    pub dial_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            dial_timeout_secs: 10,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when RUST_LOG is unset (e.g., "service_gateway=info").
    pub log_filter: String,

    /// Emit logs as JSON instead of human-readable lines.
    pub log_json: bool,

    /// Whether to expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Bind address for the metrics exporter.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "service_gateway=info,tower_http=info".to_string(),
            log_json: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.registry.poll_wait_secs, 5);
        assert_eq!(config.upstream.dial_timeout_secs, 10);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [registry]
            url = "http://registry.internal:8500"
            service_prefix = "gateway/services/"
            "#,
        )
        .unwrap();
        assert_eq!(config.registry.url, "http://registry.internal:8500");
        assert_eq!(config.registry.service_prefix, "gateway/services/");
        assert_eq!(config.registry.poll_wait_secs, 5);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
