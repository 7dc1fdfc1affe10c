//! MockCRM server binary
//!
//! Serves the mock contact API over HTTP. The store is seeded with
//! generated contacts at startup and lives only as long as the process.

use clap::Parser;
use mockcrm_core::CrmConfig;
use mockcrm_server::{CrmServer, ServerConfig};
use std::net::{IpAddr, SocketAddr};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Mock CRM contact API for integration testing.
#[derive(Parser)]
#[command(name = "mockcrm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "MOCKCRM_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "MOCKCRM_PORT", default_value_t = 3000)]
    port: u16,

    /// Seed for reproducible contact generation
    #[arg(long, env = "MOCKCRM_SEED")]
    seed: Option<u64>,

    /// Number of contacts generated at startup
    #[arg(long, env = "MOCKCRM_SEED_COUNT", default_value_t = 50)]
    seed_count: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut crm = CrmConfig::default().with_seed_count(cli.seed_count);
    if let Some(seed) = cli.seed {
        crm = crm.with_rng_seed(seed);
    }
    let config = ServerConfig::new(SocketAddr::new(cli.host, cli.port)).with_crm(crm);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Mock CRM API server");
    let server = CrmServer::new(config);
    server.serve_with_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
