//! Service publication.
//!
//! # Responsibilities
//! - Serialize a ServiceSpec and upsert it under its registry key
//! - Remove a service's key on unpublish

use std::sync::Arc;

use crate::registry::client::{Registry, RegistryError};
use crate::registry::spec::ServiceSpec;

/// Writes published services into the registry.
pub struct Publisher {
    registry: Arc<dyn Registry>,
    service_prefix: String,
}

impl Publisher {
    pub fn new(registry: Arc<dyn Registry>, service_prefix: impl Into<String>) -> Self {
        Self {
            registry,
            service_prefix: service_prefix.into(),
        }
    }

    /// Upsert `spec` at `service_prefix + spec.host`. The registry assigns a
    /// fresh version stamp on every write, so republishing an identical spec
    /// is a no-op in effect.
    pub async fn publish(&self, spec: &ServiceSpec) -> Result<(), RegistryError> {
        let payload = serde_json::to_vec(spec)?;
        let key = self.key_for(&spec.host);
        self.registry.put(&key, &payload).await?;
        tracing::info!(host = %spec.host, key = %key, "Service published");
        Ok(())
    }

    /// Delete the key for `host`. An absent key is already satisfied, not an
    /// error.
    pub async fn unpublish(&self, host: &str) -> Result<(), RegistryError> {
        let key = self.key_for(host);
        self.registry.delete(&key).await?;
        tracing::info!(host = %host, key = %key, "Service unpublished");
        Ok(())
    }

    fn key_for(&self, host: &str) -> String {
        // Direct concatenation: the prefix is expected to end appropriately.
        format!("{}{}", self.service_prefix, host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::client::RegistryEntry;
    use crate::registry::spec::BackendInfo;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingRegistry {
        puts: Mutex<Vec<(String, Vec<u8>)>>,
        deletes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Registry for RecordingRegistry {
        async fn put(&self, key: &str, value: &[u8]) -> Result<(), RegistryError> {
            self.puts.lock().unwrap().push((key.into(), value.into()));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), RegistryError> {
            self.deletes.lock().unwrap().push(key.into());
            Ok(())
        }

        async fn list(
            &self,
            _prefix: &str,
            _wait_index: u64,
            _wait_time: Duration,
        ) -> Result<(Vec<RegistryEntry>, u64), RegistryError> {
            Ok((Vec::new(), 0))
        }
    }

    fn sample_spec() -> ServiceSpec {
        ServiceSpec {
            host: "my-host.dev".into(),
            disabled: false,
            timeout: 30,
            backends: vec![BackendInfo {
                address: "http://server-a".into(),
                disabled: false,
                heart_beat_address: String::new(),
                heart_beat_timeout: 0,
            }],
        }
    }

    #[tokio::test]
    async fn publish_writes_json_under_prefixed_key() {
        let registry = Arc::new(RecordingRegistry::default());
        let publisher = Publisher::new(registry.clone(), "services/");

        publisher.publish(&sample_spec()).await.unwrap();

        let puts = registry.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "services/my-host.dev");

        let round_trip: ServiceSpec = serde_json::from_slice(&puts[0].1).unwrap();
        assert_eq!(round_trip, sample_spec());
    }

    #[tokio::test]
    async fn unpublish_deletes_prefixed_key() {
        let registry = Arc::new(RecordingRegistry::default());
        let publisher = Publisher::new(registry.clone(), "services/");

        publisher.unpublish("my-host.dev").await.unwrap();

        assert_eq!(
            *registry.deletes.lock().unwrap(),
            vec!["services/my-host.dev".to_string()]
        );
    }
}
