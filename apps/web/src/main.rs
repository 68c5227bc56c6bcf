//! # Barbearia POS web server
//!
//! ```text
//! AppConfig::load ──► Database::new (migrations) ──► build_router ──► axum::serve
//! ```

use anyhow::Context;
use barber_db::{Database, DbConfig};
use barber_web::config::AppConfig;
use barber_web::{build_router, init_tracing, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Barbearia POS...");

    let config = AppConfig::load()?;
    info!(
        addr = %config.listen_addr(),
        database = %config.database_url,
        users = config.users.len(),
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::from_url(&config.database_url)?).await?;
    let (total, applied) = db.migration_status().await?;
    info!(total, applied, "Database ready");

    let app = build_router(AppState::new(&config, db.clone()));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
