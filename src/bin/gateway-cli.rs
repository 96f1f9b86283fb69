//! Operator CLI: publish and unpublish services against the registry.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use service_gateway::registry::{
    BackendInfo, HttpRegistry, Publisher, Registry, ServiceSpec,
};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Publish services to the gateway's registry", long_about = None)]
struct Cli {
    /// Registry base URL.
    #[arg(short, long, default_value = "http://127.0.0.1:8500")]
    registry: String,

    /// Key prefix services are published under.
    #[arg(short, long, default_value = "services/")]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish (or update) a service
    Publish {
        /// Virtual host the service answers for
        host: String,
        /// Upstream base URLs; the gateway dials the first
        #[arg(required = true)]
        backends: Vec<String>,
        /// Dial timeout in seconds (0 = gateway default)
        #[arg(short, long, default_value_t = 0)]
        timeout: u64,
    },
    /// Remove a published service
    Unpublish { host: String },
    /// List published services
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let registry: Arc<dyn Registry> = Arc::new(HttpRegistry::new(&cli.registry));
    let publisher = Publisher::new(registry.clone(), cli.prefix.clone());

    match cli.command {
        Commands::Publish {
            host,
            backends,
            timeout,
        } => {
            let spec = ServiceSpec {
                host: host.clone(),
                disabled: false,
                timeout,
                backends: backends
                    .into_iter()
                    .map(|address| BackendInfo {
                        address,
                        disabled: false,
                        heart_beat_address: String::new(),
                        heart_beat_timeout: 0,
                    })
                    .collect(),
            };
            publisher.publish(&spec).await?;
            println!("published {}", host);
        }
        Commands::Unpublish { host } => {
            publisher.unpublish(&host).await?;
            println!("unpublished {}", host);
        }
        Commands::List => {
            let (entries, _) = registry
                .list(&cli.prefix, 0, Duration::from_secs(1))
                .await?;
            for entry in entries {
                match serde_json::from_slice::<ServiceSpec>(&entry.value) {
                    Ok(spec) => {
                        let backends: Vec<&str> =
                            spec.backends.iter().map(|b| b.address.as_str()).collect();
                        println!("{}\t{}", spec.host, backends.join(", "));
                    }
                    Err(_) => println!("{}\t<malformed>", entry.key),
                }
            }
        }
    }

    Ok(())
}
