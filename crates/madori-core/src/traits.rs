//! Core traits for madori abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewPlan, Plan};
use crate::validation::UpdatePlanRequest;

// =============================================================================
// PLAN REPOSITORY
// =============================================================================

/// Repository for plan records.
///
/// Every method is scoped by `company_id`: a plan belonging to another
/// company behaves exactly like a missing plan (`Error::PlanNotFound`).
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Insert a new plan and return the stored record.
    async fn insert(&self, plan: NewPlan) -> Result<Plan>;

    /// Fetch a plan by id.
    async fn fetch(&self, company_id: Uuid, id: Uuid) -> Result<Plan>;

    /// List every plan of a company, newest first.
    async fn list(&self, company_id: Uuid) -> Result<Vec<Plan>>;

    /// Apply a partial edit, regenerating the title.
    ///
    /// When `req.version` is set and does not match the stored version the
    /// update is rejected with `Error::Conflict`.
    async fn update(&self, company_id: Uuid, id: Uuid, req: UpdatePlanRequest) -> Result<Plan>;

    /// Flip the favorite flag atomically and return the updated record.
    async fn toggle_favorite(&self, company_id: Uuid, id: Uuid) -> Result<Plan>;

    /// Delete a plan and return the removed record.
    async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<Plan>;
}
