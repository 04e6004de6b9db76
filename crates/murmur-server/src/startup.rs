//! Server startup utilities.

use murmur_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    __  ___
   /  |/  /_  ________ ___  __  _______
  / /|_/ / / / / ___/ __ `__ \/ / / / ___/
 / /  / / /_/ / /  / / / / / / /_/ / /
/_/  /_/\__,_/_/  /_/ /_/ /_/\__,_/_/
    "#);
}

/// Prints where the server can be reached.
pub fn print_startup_info(config: &AppConfig, cache_backend: &str) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", addr);
    info!("Health:    http://{}/health", addr);
    if config.observability.metrics_enabled {
        info!("Metrics:   http://{}{}", addr, config.observability.metrics_path);
    }
    info!("Cache:     {} (entity TTL {}s)", cache_backend, config.cache.entity_ttl_secs);
    info!("{}", separator);
}
