//! Calendar Service - Binary Entry Point
//!
//! This is the main entry point for the calendar-server binary.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use calendar_service::api::{create_router, AppState};
use calendar_service::{Calendar, CalendarError, CalendarResult, Settings, NAME, VERSION};

#[tokio::main]
async fn main() -> CalendarResult<()> {
    let settings = Settings::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .map_err(|e| CalendarError::Config(format!("invalid log filter: {}", e)))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(name = NAME, version = VERSION, storage = %settings.storage, "starting");

    let calendar = Calendar::from_settings(&settings).await?;
    let app = create_router(Arc::new(AppState::new(calendar)));

    let listener = TcpListener::bind(settings.addr).await.map_err(|e| {
        error!(addr = %settings.addr, error = %e, "cannot bind listener");
        CalendarError::Io(e)
    })?;
    info!(addr = %settings.addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
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
                error!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
