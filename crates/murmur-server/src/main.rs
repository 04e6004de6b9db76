//! # Murmur Server
//!
//! Entry point: loads configuration, connects to PostgreSQL and the cache
//! backend, wires the services, and serves the REST API until a shutdown
//! signal arrives.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use murmur_config::{AppConfig, ConfigLoader};
use murmur_core::{telemetry, MurmurError, MurmurResult};
use murmur_repository::{create_pool, DatabasePoolInterface};
use murmur_rest::create_router;
use murmur_server::{di::AppModuleBuilder, startup};
use murmur_service::{
    create_redis_pool, metrics::register_metrics, CacheInterface, MemoryCacheService, RedisCacheService,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // The subscriber may not be installed if configuration failed.
        eprintln!("Application error: {}", e);
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> MurmurResult<()> {
    let config = ConfigLoader::from_default_location().load()?;

    telemetry::init_tracing(&config.observability.log_level, config.observability.log_format)?;
    startup::print_banner();

    info!("Starting Murmur server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let metrics_handle = install_metrics(&config)?;

    let db_pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }
    let database: Arc<dyn DatabasePoolInterface> = db_pool;

    let cache = create_cache(&config).await?;
    startup::print_startup_info(&config, cache.backend());

    let module = AppModuleBuilder::new()
        .with_database_pool(database.clone())
        .with_cache(cache)
        .with_security_config(config.security.clone())
        .with_cache_config(config.cache.clone())
        .build()?;

    let mut router = create_router(module.app_state(), &config.server);
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics_router(&config.observability.metrics_path, handle));
    }

    let addr = config.server.addr();
    info!("Starting REST server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MurmurError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MurmurError::Internal(format!("REST server error: {}", e)))?;

    database.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Installs the Prometheus recorder when metrics are enabled.
fn install_metrics(config: &AppConfig) -> MurmurResult<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MurmurError::Configuration(format!("Failed to install metrics recorder: {}", e)))?;
    register_metrics();

    Ok(Some(handle))
}

fn metrics_router(path: &str, handle: PrometheusHandle) -> Router {
    Router::new().route(path, get(move || std::future::ready(handle.render())))
}

/// Connects to Redis, or falls back to the in-process cache when disabled.
async fn create_cache(config: &AppConfig) -> MurmurResult<Arc<dyn CacheInterface>> {
    if config.redis.enabled {
        let pool = create_redis_pool(&config.redis).await?;
        Ok(Arc::new(RedisCacheService::new(pool)))
    } else {
        warn!("Redis disabled; using the in-process cache. Revocations are not shared between instances.");
        Ok(Arc::new(MemoryCacheService::new()))
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
