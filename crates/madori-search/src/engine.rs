//! Repository-backed plan search.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use madori_core::{Plan, PlanRepository, Result, SearchFilters};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::query::search_plans;

/// Trait for plan search implementations.
#[async_trait]
pub trait PlanSearch: Send + Sync {
    /// Search one company's plans, newest first.
    async fn search(&self, company_id: Uuid, filters: &SearchFilters) -> Result<Vec<Plan>>;
}

/// Searches a consistent snapshot of a company's catalog.
///
/// The catalog is loaded through the repository and filtered in memory; no
/// index is involved.
#[derive(Clone)]
pub struct PlanSearchEngine {
    repo: Arc<dyn PlanRepository>,
}

impl PlanSearchEngine {
    pub fn new(repo: Arc<dyn PlanRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl PlanSearch for PlanSearchEngine {
    #[instrument(skip(self, filters), fields(
        subsystem = "search",
        component = "plan_search",
        op = "search",
        company_id = %company_id,
    ))]
    async fn search(&self, company_id: Uuid, filters: &SearchFilters) -> Result<Vec<Plan>> {
        let start = Instant::now();

        let snapshot = self.repo.list(company_id).await?;
        debug!(
            input_count = snapshot.len(),
            unconstrained = filters.is_empty(),
            "Loaded catalog snapshot"
        );

        let results = search_plans(&snapshot, filters);

        info!(
            input_count = snapshot.len(),
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Plan search completed"
        );

        Ok(results)
    }
}
