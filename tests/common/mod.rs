//! Shared utilities for integration testing: programmable mock backends and
//! an in-memory registry double with real blocking-query semantics.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::time::Instant;

use service_gateway::registry::{Registry, RegistryEntry, RegistryError};

/// The head of a request as seen by a mock backend.
#[allow(dead_code)]
pub struct ReceivedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
}

#[allow(dead_code)]
impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Start a mock backend whose handler maps a received request head to
/// `(status, extra headers, body)`. Returns the bound address.
#[allow(dead_code)]
pub async fn start_programmable_backend<F>(handler: F) -> SocketAddr
where
    F: Fn(ReceivedRequest) -> (u16, Vec<(String, String)>, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let handler = handler.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let mut lines = head.split("\r\n");
                let request_line = lines.next().unwrap_or_default();
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let target = parts.next().unwrap_or_default().to_string();
                let headers = lines
                    .take_while(|line| !line.is_empty())
                    .filter_map(|line| {
                        line.split_once(':')
                            .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
                    })
                    .collect();

                let (status, extra_headers, body) = handler(ReceivedRequest {
                    method,
                    target,
                    headers,
                });

                let status_text = match status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    502 => "Bad Gateway",
                    503 => "Service Unavailable",
                    _ => "OK",
                };
                let mut response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                    status,
                    status_text,
                    body.len()
                );
                for (name, value) in extra_headers {
                    response.push_str(&format!("{}: {}\r\n", name, value));
                }
                response.push_str("\r\n");
                response.push_str(&body);
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a mock backend that answers every request with a fixed body.
#[allow(dead_code)]
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| (200, Vec::new(), body.to_string())).await
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<String, (Vec<u8>, u64)>,
    index: u64,
}

/// In-memory registry double.
///
/// Mirrors the production contract: writes bump a global change index that
/// also stamps the written entry, and `list` with a non-zero wait index
/// blocks until the index moves past it or the wait expires. `set_failing`
/// makes every call fail, for outage scenarios.
pub struct InMemoryRegistry {
    state: Mutex<RegistryState>,
    changed: Notify,
    failing: AtomicBool,
}

#[allow(dead_code)]
impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            // Registries never report index 0; 0 is the "no cursor" sentinel.
            state: Mutex::new(RegistryState {
                entries: HashMap::new(),
                index: 1,
            }),
            changed: Notify::new(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
        self.changed.notify_waiters();
    }

    fn check_available(&self) -> Result<(), RegistryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RegistryError::Transport("registry unreachable".into()));
        }
        Ok(())
    }

    fn listing(prefix: &str, state: &RegistryState) -> (Vec<RegistryEntry>, u64) {
        let mut entries: Vec<RegistryEntry> = state
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, (value, version))| RegistryEntry {
                key: key.clone(),
                value: value.clone(),
                version: *version,
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        (entries, state.index)
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), RegistryError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();
        state.index += 1;
        let version = state.index;
        state.entries.insert(key.to_string(), (value.to_vec(), version));
        drop(state);
        self.changed.notify_waiters();
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RegistryError> {
        self.check_available()?;
        let mut state = self.state.lock().unwrap();
        if state.entries.remove(key).is_some() {
            state.index += 1;
        }
        drop(state);
        self.changed.notify_waiters();
        Ok(())
    }

    async fn list(
        &self,
        prefix: &str,
        wait_index: u64,
        wait_time: Duration,
    ) -> Result<(Vec<RegistryEntry>, u64), RegistryError> {
        let deadline = Instant::now() + wait_time;
        loop {
            self.check_available()?;
            let notified = self.changed.notified();
            {
                let state = self.state.lock().unwrap();
                if wait_index == 0 || state.index > wait_index {
                    return Ok(Self::listing(prefix, &state));
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero()
                || tokio::time::timeout(remaining, notified).await.is_err()
            {
                self.check_available()?;
                let state = self.state.lock().unwrap();
                return Ok(Self::listing(prefix, &state));
            }
        }
    }
}
