//! # madori-db
//!
//! Persistence layer for madori.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL and in-memory implementations of `PlanRepository`
//! - Blob storage for plan PDFs with BLAKE3 content hashes
//!
//! ## Example
//!
//! ```rust,ignore
//! use madori_db::{Database, PlanRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/madori").await?;
//!     let plans = db.plans.list(company_id).await?;
//!     println!("{} plans", plans.len());
//!     Ok(())
//! }
//! ```

pub mod file_storage;
pub mod memory;
pub mod plans;
pub mod pool;

// Always compiled so integration tests (in tests/) can use it
pub mod test_fixtures;

// Re-export core types
pub use madori_core::*;

use madori_core::defaults::DB_MAX_CONNECTIONS;

pub use file_storage::{
    compute_content_hash, plan_storage_path, FilesystemBackend, StorageBackend,
};
pub use memory::InMemoryPlanRepository;
pub use plans::PgPlanRepository;
pub use pool::{create_pool, log_pool_metrics, plan_pool_options};

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Plan repository.
    pub plans: PgPlanRepository,
}

impl Database {
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            plans: PgPlanRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with the default connection cap.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_max(url, DB_MAX_CONNECTIONS).await
    }

    /// Connect with at most `max_connections` pooled connections.
    pub async fn connect_with_max(url: &str, max_connections: u32) -> Result<Self> {
        let pool = create_pool(url, max_connections).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
