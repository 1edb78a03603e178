use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_toolkit::config::{loader, load_config, ToolkitConfig};
use api_toolkit::lifecycle::{init_state, signals, Shutdown, StartupError};
use api_toolkit::observability::logging;
use api_toolkit::HttpServer;

#[derive(Parser)]
#[command(name = "api-toolkit")]
#[command(about = "QR code, exchange rate and IP geolocation API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "TOOLKIT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = ToolkitConfig::default();
            loader::apply_env_overrides(&mut config);
            config
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("api-toolkit v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        database_url = %config.database.url,
        "Configuration loaded"
    );

    let bind_address = config.listener.bind_address.clone();
    let state = init_state(config).await?;
    let audit = state.audit.clone();

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let result = HttpServer::new(state).run(listener, server_shutdown).await;
    audit.close().await;

    result?;
    tracing::info!("Shutdown complete");
    Ok(())
}
