//! Property filter HTTP microservice.
//!
//! Accepts a batch of property records and returns the completed `htv` ones
//! with their address flattened into a single line.
//!
//! # Endpoints
//!
//! - `POST /` - Filter a `{"payload": [...]}` batch of property records
//!
//! Every other method or path answers `404 {"error": "Not Found!!!"}`.
//!
//! # Configuration
//!
//! - `APP_ENV` - `development` (default) or anything else for production
//! - `PORT` - HTTP port (default: 3000)
//! - `BODY_LIMIT_BYTES` - Maximum request body size (default: 102400)
//! - `SIMULATE_STEP_FAILURE` - Make every filter step reject (default: false)
//! - `DOTENV_PATH` - dotenv file read at startup (default: variables.env)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};

use propfilter_service_shared::{
    build_router, init_logging, load_dotenv, AppState, LoggingConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the dotenv file before anything reads the environment
    let dotenv_path = load_dotenv()?;

    let logging_config = LoggingConfig::from_env().with_service("propfilter");
    init_logging(&logging_config);

    let config = ServiceConfig::from_env()?;
    info!(
        dotenv = ?dotenv_path,
        environment = ?config.environment,
        port = config.port,
        body_limit = config.body_limit,
        "starting property filter service"
    );
    if config.simulate_step_failure {
        warn!("SIMULATE_STEP_FAILURE is set; every filter request will fail");
    }

    let app = build_router(AppState::from_config(&config));

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
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
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
