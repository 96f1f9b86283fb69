//! Production registry client.
//!
//! Speaks a Consul-compatible KV HTTP API: recursive reads are blocking
//! queries driven by the `index` + `wait` query parameters, and every
//! response carries the store's current change index in the
//! `X-Consul-Index` header.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use crate::registry::client::{Registry, RegistryEntry, RegistryError};

/// Extra headroom on the HTTP request deadline so a full-length blocking
/// query is not cut off by our own client timeout.
const WAIT_SLACK: Duration = Duration::from_secs(2);

const INDEX_HEADER: &str = "X-Consul-Index";

/// Registry client over a Consul-style KV HTTP API.
pub struct HttpRegistry {
    client: reqwest::Client,
    base: String,
}

/// One KV pair as listed by the registry. Values are base64 on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KvPair {
    key: String,
    value: Option<String>,
    modify_index: u64,
}

impl HttpRegistry {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn kv_url(&self, key: &str) -> String {
        format!("{}/v1/kv/{}", self.base, key)
    }
}

fn decode_entries(pairs: Vec<KvPair>) -> Result<Vec<RegistryEntry>, RegistryError> {
    pairs
        .into_iter()
        .map(|pair| {
            let value = match pair.value {
                Some(encoded) => BASE64
                    .decode(encoded)
                    .map_err(|e| RegistryError::Decode(format!("{}: {}", pair.key, e)))?,
                None => Vec::new(),
            };
            Ok(RegistryEntry {
                key: pair.key,
                value,
                version: pair.modify_index,
            })
        })
        .collect()
}

fn index_from_headers(headers: &reqwest::header::HeaderMap, fallback: u64) -> u64 {
    headers
        .get(INDEX_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

#[async_trait]
impl Registry for HttpRegistry {
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), RegistryError> {
        let response = self
            .client
            .put(self.kv_url(key))
            .body(value.to_vec())
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RegistryError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RegistryError> {
        let response = self
            .client
            .delete(self.kv_url(key))
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let status = response.status();
        // Absent key: already satisfied.
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(RegistryError::Status(status.as_u16()))
    }

    async fn list(
        &self,
        prefix: &str,
        wait_index: u64,
        wait_time: Duration,
    ) -> Result<(Vec<RegistryEntry>, u64), RegistryError> {
        let mut request = self
            .client
            .get(self.kv_url(prefix))
            .query(&[("recurse", "true")])
            .timeout(wait_time + WAIT_SLACK);

        if wait_index > 0 {
            request = request.query(&[
                ("index", wait_index.to_string()),
                ("wait", format!("{}s", wait_time.as_secs())),
            ]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let status = response.status();
        let index = index_from_headers(response.headers(), wait_index);

        // An empty prefix lists as 404, not as an error.
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok((Vec::new(), index));
        }
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let pairs: Vec<KvPair> = response
            .json()
            .await
            .map_err(|e| RegistryError::Decode(e.to_string()))?;

        Ok((decode_entries(pairs)?, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_url_joins_without_double_slash() {
        let registry = HttpRegistry::new("http://127.0.0.1:8500/");
        assert_eq!(
            registry.kv_url("services/my-host.dev"),
            "http://127.0.0.1:8500/v1/kv/services/my-host.dev"
        );
    }

    #[test]
    fn decodes_listing_payload() {
        let raw = r#"[
            {"Key": "services/a.dev", "Value": "eyJob3N0IjoiYS5kZXYifQ==", "ModifyIndex": 41},
            {"Key": "services/b.dev", "Value": null, "ModifyIndex": 42}
        ]"#;
        let pairs: Vec<KvPair> = serde_json::from_str(raw).unwrap();
        let entries = decode_entries(pairs).unwrap();

        assert_eq!(entries[0].key, "services/a.dev");
        assert_eq!(entries[0].value, br#"{"host":"a.dev"}"#.to_vec());
        assert_eq!(entries[0].version, 41);
        assert!(entries[1].value.is_empty());
    }

    #[test]
    fn bad_base64_is_a_decode_error() {
        let pairs = vec![KvPair {
            key: "services/x".into(),
            value: Some("!!!not-base64!!!".into()),
            modify_index: 7,
        }];
        assert!(matches!(
            decode_entries(pairs),
            Err(RegistryError::Decode(_))
        ));
    }
}
