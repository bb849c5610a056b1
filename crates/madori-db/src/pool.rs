//! Connection pool for the plan store.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use madori_core::{Error, Result};

/// How long a repository call waits for a free connection.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool options for the plan store. A zero cap is raised to one connection.
pub fn plan_pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Open a pool of at most `max_connections` connections to `database_url`.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let start = Instant::now();
    let options = plan_pool_options(max_connections);
    let cap = options.get_max_connections();

    let pool = options.connect(database_url).await.map_err(|e| {
        warn!(subsystem = "database", error = %e, "Plan store unreachable");
        Error::Database(e)
    })?;

    info!(
        subsystem = "database",
        max_connections = cap,
        duration_ms = start.elapsed().as_millis() as u64,
        "Plan store pool ready"
    );
    Ok(pool)
}

/// Log pool occupancy; warns when every connection is checked out.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();
    debug!(subsystem = "database", pool_size = size, pool_idle = idle, "Pool occupancy");
    if size > 0 && idle == 0 {
        warn!(subsystem = "database", pool_size = size, "No idle plan store connections");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_use_configured_cap() {
        let options = plan_pool_options(4);
        assert_eq!(options.get_max_connections(), 4);
        assert_eq!(options.get_acquire_timeout(), ACQUIRE_TIMEOUT);
    }

    #[test]
    fn test_zero_cap_keeps_one_connection() {
        assert_eq!(plan_pool_options(0).get_max_connections(), 1);
    }
}
