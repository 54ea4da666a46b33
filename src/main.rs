//! cors-https-server binary: parse flags, validate, serve until interrupted.

use std::process::ExitCode;

use axum_server::Handle;
use clap::Parser;

use cors_https_server::config::{validate_config, Cli, ServerConfig};
use cors_https_server::lifecycle::shutdown_on_signal;
use cors_https_server::observability::init_logging;
use cors_https_server::HttpServer;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::info!("cors-https-server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match ServerConfig::try_from(cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = validate_config(&config) {
        tracing::error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        address = %config.address,
        port = config.port,
        root = %config.root.display(),
        origins = %config.origins,
        credentials = config.allow_credentials,
        extra_headers = config.extra_headers.len(),
        tls = config.tls.is_some(),
        "Configuration loaded"
    );
    if config.allow_credentials && !config.origins.is_enabled() {
        tracing::warn!("--cors-credentials has no effect without --origins or --all-origins");
    }

    let handle = Handle::new();
    shutdown_on_signal(handle.clone());

    let server = HttpServer::new(config);
    if let Err(e) = server.run(handle).await {
        tracing::error!("{}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
