//! Gateway entry point.
//!
//! Wires the subsystems together: configuration, logging, metrics, the
//! registry watch loop, the routing-table sync loop, and the HTTP serving
//! path, then runs until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;

use service_gateway::config::{load_config, GatewayConfig};
use service_gateway::gateway::{run_sync, Gateway};
use service_gateway::lifecycle::{wait_for_signal, Shutdown};
use service_gateway::observability::{logging, metrics};
use service_gateway::proxy::HttpProxyCreator;
use service_gateway::registry::{HttpRegistry, Subscriber};

#[derive(Parser)]
#[command(name = "service-gateway")]
#[command(about = "Host-routing API gateway fed from a service registry", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        registry_url = %config.registry.url,
        service_prefix = %config.registry.service_prefix,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();

    let registry = Arc::new(HttpRegistry::new(&config.registry.url));
    let creator = Arc::new(HttpProxyCreator::new(Duration::from_secs(
        config.upstream.dial_timeout_secs,
    )));
    let gateway = Arc::new(Gateway::new(&config.listener.bind_address, creator));

    // Watch loop → capacity-1 handoff → sync loop.
    let (tx, rx) = mpsc::channel(1);
    let subscriber = Subscriber::new(
        registry,
        config.registry.service_prefix.clone(),
        Duration::from_secs(config.registry.poll_wait_secs),
    );
    let subscriber_task = tokio::spawn(subscriber.run(tx, shutdown.subscribe()));
    let sync_task = tokio::spawn(run_sync(gateway.clone(), rx));

    gateway.start().await?;

    wait_for_signal().await;
    tracing::info!("Shutting down");

    shutdown.trigger();
    let _ = subscriber_task.await;
    let _ = sync_task.await;
    gateway.stop().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
