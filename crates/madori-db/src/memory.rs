//! In-process plan repository.
//!
//! Used when no `DATABASE_URL` is configured and by tests. Records live in
//! insertion order behind a single `RwLock`, so every mutation is a complete
//! read-modify-write under the write lock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use madori_core::{Error, NewPlan, Plan, PlanRepository, Result, UpdatePlanRequest};

#[derive(Clone, Default)]
pub struct InMemoryPlanRepository {
    plans: Arc<RwLock<Vec<Plan>>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing records.
    pub fn with_plans(plans: Vec<Plan>) -> Self {
        Self {
            plans: Arc::new(RwLock::new(plans)),
        }
    }

    pub async fn len(&self) -> usize {
        self.plans.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.plans.read().await.is_empty()
    }
}

fn position(plans: &[Plan], company_id: Uuid, id: Uuid) -> Result<usize> {
    plans
        .iter()
        .position(|p| p.id == id && p.company_id == company_id)
        .ok_or(Error::PlanNotFound(id))
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn insert(&self, req: NewPlan) -> Result<Plan> {
        let mut plans = self.plans.write().await;
        if plans.iter().any(|p| p.id == req.id) {
            return Err(Error::Conflict(format!("Plan {} already exists", req.id)));
        }
        let plan = req.into_plan(Utc::now());
        plans.push(plan.clone());
        Ok(plan)
    }

    async fn fetch(&self, company_id: Uuid, id: Uuid) -> Result<Plan> {
        let plans = self.plans.read().await;
        let idx = position(&plans, company_id, id)?;
        Ok(plans[idx].clone())
    }

    async fn list(&self, company_id: Uuid) -> Result<Vec<Plan>> {
        let plans = self.plans.read().await;
        let mut owned: Vec<Plan> = plans
            .iter()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(&self, company_id: Uuid, id: Uuid, req: UpdatePlanRequest) -> Result<Plan> {
        let mut plans = self.plans.write().await;
        let idx = position(&plans, company_id, id)?;

        let current = &plans[idx];
        if let Some(expected) = req.version {
            if expected != current.version {
                return Err(Error::Conflict(format!(
                    "Plan {} was modified concurrently (expected version {}, found {})",
                    id, expected, current.version
                )));
            }
        }
        if req.is_empty() {
            return Ok(current.clone());
        }

        let mut updated = current.clone();
        updated.apply_update(&req)?;
        updated.version += 1;
        updated.updated_at = Utc::now();
        plans[idx] = updated.clone();
        Ok(updated)
    }

    async fn toggle_favorite(&self, company_id: Uuid, id: Uuid) -> Result<Plan> {
        let mut plans = self.plans.write().await;
        let idx = position(&plans, company_id, id)?;

        let plan = &mut plans[idx];
        plan.favorite = !plan.favorite;
        plan.version += 1;
        plan.updated_at = Utc::now();
        Ok(plan.clone())
    }

    async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<Plan> {
        let mut plans = self.plans.write().await;
        let idx = position(&plans, company_id, id)?;
        Ok(plans.remove(idx))
    }
}
