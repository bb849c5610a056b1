//! Plan repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use madori_core::{Error, NewPlan, Plan, PlanRepository, Result, UpdatePlanRequest};

const PLAN_COLUMNS: &str = "id, company_id, uploaded_by, title, layout, floors, total_area, \
     site_area, direction, features, favorite, original_filename, pdf_path, content_hash, \
     version, created_at, updated_at";

fn plan_from_row(row: &PgRow) -> Result<Plan> {
    Ok(Plan {
        id: row.try_get("id")?,
        company_id: row.try_get("company_id")?,
        uploaded_by: row.try_get("uploaded_by")?,
        title: row.try_get("title")?,
        layout: row.try_get("layout")?,
        floors: row.try_get("floors")?,
        total_area: row.try_get("total_area")?,
        site_area: row.try_get("site_area")?,
        direction: row.try_get("direction")?,
        features: row.try_get("features")?,
        favorite: row.try_get("favorite")?,
        original_filename: row.try_get("original_filename")?,
        pdf_path: row.try_get("pdf_path")?,
        content_hash: row.try_get("content_hash")?,
        version: row.try_get("version")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL implementation of PlanRepository.
#[derive(Clone)]
pub struct PgPlanRepository {
    pool: Pool<Postgres>,
}

impl PgPlanRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn insert(&self, req: NewPlan) -> Result<Plan> {
        let plan = req.into_plan(Utc::now());

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO plan ({PLAN_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(plan.id)
        .bind(plan.company_id)
        .bind(plan.uploaded_by)
        .bind(&plan.title)
        .bind(&plan.layout)
        .bind(&plan.floors)
        .bind(plan.total_area)
        .bind(plan.site_area)
        .bind(&plan.direction)
        .bind(&plan.features)
        .bind(plan.favorite)
        .bind(&plan.original_filename)
        .bind(&plan.pdf_path)
        .bind(&plan.content_hash)
        .bind(plan.version)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::Conflict(format!("Plan {} already exists", plan.id))
            }
            other => Error::Database(other),
        })?;

        debug!(
            subsystem = "database",
            component = "plans",
            op = "insert",
            plan_id = %plan.id,
            company_id = %plan.company_id,
            "Plan inserted"
        );
        plan_from_row(&row)
    }

    async fn fetch(&self, company_id: Uuid, id: Uuid) -> Result<Plan> {
        let row = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM plan WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::PlanNotFound(id))?;

        plan_from_row(&row)
    }

    async fn list(&self, company_id: Uuid) -> Result<Vec<Plan>> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM plan WHERE company_id = $1 ORDER BY created_at DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(plan_from_row).collect()
    }

    async fn update(&self, company_id: Uuid, id: Uuid, req: UpdatePlanRequest) -> Result<Plan> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let row = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM plan WHERE company_id = $1 AND id = $2 FOR UPDATE"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::PlanNotFound(id))?;
        let mut plan = plan_from_row(&row)?;

        if let Some(expected) = req.version {
            if expected != plan.version {
                return Err(Error::Conflict(format!(
                    "Plan {} was modified concurrently (expected version {}, found {})",
                    id, expected, plan.version
                )));
            }
        }
        if req.is_empty() {
            return Ok(plan);
        }

        plan.apply_update(&req)?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE plan
            SET title = $3, layout = $4, floors = $5, total_area = $6, site_area = $7,
                direction = $8, features = $9, version = version + 1, updated_at = $10
            WHERE company_id = $1 AND id = $2
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(id)
        .bind(&plan.title)
        .bind(&plan.layout)
        .bind(&plan.floors)
        .bind(plan.total_area)
        .bind(plan.site_area)
        .bind(&plan.direction)
        .bind(&plan.features)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "plans",
            op = "update",
            plan_id = %id,
            "Plan updated"
        );
        plan_from_row(&row)
    }

    async fn toggle_favorite(&self, company_id: Uuid, id: Uuid) -> Result<Plan> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE plan
            SET favorite = NOT favorite, version = version + 1, updated_at = $3
            WHERE company_id = $1 AND id = $2
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::PlanNotFound(id))?;

        plan_from_row(&row)
    }

    async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<Plan> {
        let row = sqlx::query(&format!(
            "DELETE FROM plan WHERE company_id = $1 AND id = $2 RETURNING {PLAN_COLUMNS}"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::PlanNotFound(id))?;

        debug!(
            subsystem = "database",
            component = "plans",
            op = "delete",
            plan_id = %id,
            "Plan deleted"
        );
        plan_from_row(&row)
    }
}
