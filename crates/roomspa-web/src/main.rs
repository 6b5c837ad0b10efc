//! Web server for the `RoomSpa` admin dashboard
#![forbid(unsafe_code)]

use clap::Parser;
use roomspa_core::{
    Config,
    context_error::{Result, ResultExt},
    init_logging,
};
use roomspa_web::build_app;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Command line options; flags override the configuration file
#[derive(Debug, Parser)]
#[command(name = "roomspa-admin", version, about = "RoomSpa admin dashboard")]
struct Cli {
    /// Configuration file, `config.toml` in the working directory when omitted
    #[arg(short, long, env = "ROOMSPA_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            eprintln!("Note: configuration not loaded ({err}), using defaults");
            Config::default()
        }),
    };
    if let Some(host) = &cli.host {
        config.webserver.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.webserver.port = port;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %config.backend.base_url,
        "Starting RoomSpa admin dashboard"
    );

    let host: IpAddr = config
        .webserver
        .host
        .parse()
        .with_context(|| format!("Invalid web server host '{}'", config.webserver.host))?;
    let addr = SocketAddr::new(host, config.webserver.port);

    let app = build_app(config)?;

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Admin dashboard listening on http://{addr}/admin");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
