//! madori-api server binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use madori_api::{app, parse_allowed_origins, ApiConfig, AppState};
use madori_core::PlanRepository;
use madori_db::{Database, FilesystemBackend, InMemoryPlanRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("loading configuration")?;

    // LOG_FORMAT ("json" | "text"), LOG_FILE (daily rotation), LOG_ANSI, RUST_LOG
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "madori_api=debug,madori_search=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let _file_guard = if let Some(ref path) = config.log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("madori-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if config.log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            // no ANSI in files unless forced
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(config.log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if config.log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = config.log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %config.log_format,
        log_file = config.log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let plans: Arc<dyn PlanRepository> = match config.database_url.as_deref() {
        Some(url) => {
            let db = Database::connect_with_max(url, config.database_max_connections)
                .await
                .context("connecting to database")?;
            db.migrate().await.context("running migrations")?;
            info!(
                subsystem = "database",
                pool_size = config.database_max_connections,
                "Connected to database"
            );
            madori_db::log_pool_metrics(db.pool());
            Arc::new(db.plans)
        }
        None => {
            warn!("DATABASE_URL not set, plans are kept in memory and lost on restart");
            Arc::new(InMemoryPlanRepository::new())
        }
    };

    let storage = FilesystemBackend::new(&config.file_storage_path);
    if let Err(e) = storage.validate().await {
        anyhow::bail!(
            "File storage at {} is not usable: {}",
            config.file_storage_path,
            e
        );
    }
    info!(
        subsystem = "storage",
        storage_path = %config.file_storage_path,
        "File storage validated"
    );

    let state = AppState::new(plans, Arc::new(storage), config.max_upload_bytes);
    let router = app(state, parse_allowed_origins(&config.allowed_origins));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(address = %addr, "madori-api listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
