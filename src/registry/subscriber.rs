//! Registry watch loop.
//!
//! # Responsibilities
//! - Long-poll the registry under the service prefix
//! - Diff each listing against the last observed snapshot
//! - Emit added/updated specs to the consumer channel
//!
//! # Design Decisions
//! - Registry errors are transient: reset the watch cursor and retry
//!   immediately, never surface to the consumer
//! - Emit blocks until the consumer accepts (capacity-1 channel), which is
//!   the backpressure mechanism
//! - A key that disappears between polls emits nothing; stale entries are
//!   only ever removed through an explicit Gateway::remove_service

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use crate::observability::metrics;
use crate::registry::client::{Registry, RegistryEntry};
use crate::registry::spec::ServiceSpec;

/// Watches the registry and forwards service additions and updates.
pub struct Subscriber {
    registry: Arc<dyn Registry>,
    service_prefix: String,
    wait_time: Duration,
}

impl Subscriber {
    pub fn new(
        registry: Arc<dyn Registry>,
        service_prefix: impl Into<String>,
        wait_time: Duration,
    ) -> Self {
        Self {
            registry,
            service_prefix: service_prefix.into(),
            wait_time,
        }
    }

    /// Run the watch loop until `shutdown` fires or the consumer goes away.
    ///
    /// Dropping the sender on exit closes the channel, so the consumer
    /// observes termination. Cancellation latency is bounded by one poll
    /// wait plus one emit.
    pub async fn run(self, tx: mpsc::Sender<ServiceSpec>, mut shutdown: broadcast::Receiver<()>) {
        let mut last_version: u64 = 0;
        let mut snapshot: HashMap<String, u64> = HashMap::new();

        tracing::info!(
            prefix = %self.service_prefix,
            wait_secs = self.wait_time.as_secs(),
            "Subscriber starting"
        );

        loop {
            let (entries, index) = tokio::select! {
                result = self.registry.list(&self.service_prefix, last_version, self.wait_time) => {
                    match result {
                        Ok(listing) => listing,
                        Err(e) => {
                            tracing::warn!(error = %e, "Registry poll failed, resyncing from scratch");
                            metrics::record_registry_error();
                            last_version = 0;
                            continue;
                        }
                    }
                }
                _ = shutdown.recv() => break,
            };

            last_version = index;
            let next_snapshot: HashMap<String, u64> = entries
                .iter()
                .map(|entry| (entry.key.clone(), entry.version))
                .collect();

            for entry in changed(&snapshot, &entries) {
                let spec: ServiceSpec = match serde_json::from_slice(&entry.value) {
                    Ok(spec) => spec,
                    Err(e) => {
                        tracing::warn!(key = %entry.key, error = %e, "Skipping malformed service entry");
                        continue;
                    }
                };

                tracing::debug!(key = %entry.key, version = entry.version, "Service changed");
                tokio::select! {
                    result = tx.send(spec) => {
                        if result.is_err() {
                            tracing::info!("Subscriber consumer gone, exiting");
                            return;
                        }
                    }
                    _ = shutdown.recv() => return,
                }
            }

            snapshot = next_snapshot;
        }

        tracing::info!("Subscriber received shutdown signal, exiting loop");
    }
}

/// Entries that are new or whose version stamp moved since `snapshot`.
///
/// Keys present in `snapshot` but missing from `entries` yield nothing:
/// deletions are invisible to consumers.
fn changed<'a>(
    snapshot: &HashMap<String, u64>,
    entries: &'a [RegistryEntry],
) -> Vec<&'a RegistryEntry> {
    entries
        .iter()
        .filter(|entry| snapshot.get(&entry.key) != Some(&entry.version))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, version: u64) -> RegistryEntry {
        RegistryEntry {
            key: key.into(),
            value: format!(r#"{{"host":"{}"}}"#, key).into_bytes(),
            version,
        }
    }

    fn keys(entries: Vec<&RegistryEntry>) -> Vec<&str> {
        entries.into_iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn empty_snapshot_reports_everything() {
        let listing = vec![entry("a", 1), entry("b", 2)];
        assert_eq!(keys(changed(&HashMap::new(), &listing)), vec!["a", "b"]);
    }

    #[test]
    fn unchanged_versions_report_nothing() {
        let snapshot = HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
        let listing = vec![entry("a", 1), entry("b", 2)];
        assert!(changed(&snapshot, &listing).is_empty());
    }

    #[test]
    fn moved_version_reports_only_that_key() {
        let snapshot = HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
        let listing = vec![entry("a", 1), entry("b", 5)];
        assert_eq!(keys(changed(&snapshot, &listing)), vec!["b"]);
    }

    #[test]
    fn new_key_reports_alongside_unchanged() {
        let snapshot = HashMap::from([("a".to_string(), 1)]);
        let listing = vec![entry("a", 1), entry("c", 3)];
        assert_eq!(keys(changed(&snapshot, &listing)), vec!["c"]);
    }

    #[test]
    fn removed_key_reports_nothing() {
        // "b" disappeared from the listing; by design that is not an event.
        let snapshot = HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
        let listing = vec![entry("a", 1)];
        assert!(changed(&snapshot, &listing).is_empty());
    }
}
