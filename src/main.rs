use kelp_kv::cli::Cli;
use kelp_kv::config::Config;
use kelp_kv::telemetry::{self, TelemetryConfig};
use kelp_kv::{CommandTable, MemoryStore, Server};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> kelp_kv::Result<()> {
    let cli = Cli::parse();

    if cli.examples {
        Cli::print_examples();
        return Ok(());
    }

    telemetry::init_logging(cli.verbose, cli.debug)?;

    let config = Config::from_sources(&cli)?;
    info!(?config, "configuration loaded");

    let _telemetry = telemetry::init_telemetry_with_config(TelemetryConfig::from(&config.telemetry))?;

    let store = Arc::new(MemoryStore::new());
    let commands = Arc::new(CommandTable::with_builtin_commands());
    info!(commands = commands.len(), "command table ready");

    let server = Server::bind(&config.server, Arc::clone(&store), commands).await?;
    server.run_until(shutdown_signal()).await?;

    info!("shutting down");
    store.save()?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl-C"),
        Err(e) => error!(error = %e, "failed to listen for Ctrl-C, shutting down"),
    }
}
