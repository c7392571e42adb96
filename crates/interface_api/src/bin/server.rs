//! Bind Portal API server
//!
//! ```bash
//! API_DATABASE_URL=postgres://... API_JWT_SECRET=... cargo run --bin bind-portal-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST`, `API_PORT` - listen address (default 0.0.0.0:8080)
//! * `API_JWT_SECRET` - HS256 signing secret
//! * `API_JWT_EXPIRATION_SECS` - token lifetime (default 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - default filter when `RUST_LOG` is unset
//! * `API_ESIGN_BASE_URL` - signer portal link base
//! * `API_CHROMIUM_PATH`, `API_PDF_TIMEOUT_SECS` - PDF rendering
//! * `API_AGENCY__NAME`, `API_AGENCY__STREET`, `API_AGENCY__PHONE`, ... - producing agency on documents

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_documents::ChromiumPdfRenderer;
use domain_submission::MockPaymentProcessor;
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresWorkflowAdapter};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;
    init_tracing(&config.log_level);

    tracing::info!(host = %config.host, port = config.port, "Starting Bind Portal API server");

    let pool = create_pool(DatabaseConfig::new(config.database_url.clone()))
        .await
        .context("database connection failed")?;
    run_migrations(&pool).await.context("migrations failed")?;

    let renderer = ChromiumPdfRenderer::new(config.chromium_path.clone()).with_timeout(config.pdf_timeout());
    let addr: SocketAddr = config.server_addr().parse().context("invalid listen address")?;

    let state = AppState::new(
        Arc::new(PostgresWorkflowAdapter::new(pool)),
        Arc::new(MockPaymentProcessor::new()),
        Arc::new(renderer),
        config,
    );
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
