//! Core data models for madori.
//!
//! These types are shared across all madori crates and represent the
//! floor-plan catalog's domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filename::build_title;

// =============================================================================
// PLAN METADATA
// =============================================================================

/// The authored metadata fields of a plan.
///
/// This is [`PlanMetadata`] without the derived `title` and the
/// `original_filename`; it is the input of
/// [`generate_filename`](crate::filename::generate_filename) and of structured
/// metadata edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlanFields {
    /// Building floor area in tsubo (`0` = unknown).
    pub total_area: f64,
    pub layout: String,
    pub floors: String,
    pub direction: String,
    /// Site area in tsubo (`0` = unknown).
    pub site_area: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Metadata extracted from a plan filename (or from structured upload input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlanMetadata {
    /// Human-readable summary, always derived from the other fields.
    pub title: String,
    pub layout: String,
    pub floors: String,
    pub total_area: f64,
    pub direction: String,
    pub site_area: f64,
    pub features: Vec<String>,
    pub original_filename: String,
}

impl PlanMetadata {
    /// Build metadata from authored fields, deriving the title.
    pub fn from_fields(fields: PlanFields, original_filename: impl Into<String>) -> Self {
        let title = build_title(&fields);
        Self {
            title,
            layout: fields.layout,
            floors: fields.floors,
            total_area: fields.total_area,
            direction: fields.direction,
            site_area: fields.site_area,
            features: fields.features,
            original_filename: original_filename.into(),
        }
    }

    pub fn fields(&self) -> PlanFields {
        PlanFields {
            total_area: self.total_area,
            layout: self.layout.clone(),
            floors: self.floors.clone(),
            direction: self.direction.clone(),
            site_area: self.site_area,
            features: self.features.clone(),
        }
    }
}

// =============================================================================
// PLAN RECORD
// =============================================================================

/// A persisted floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Plan {
    pub id: Uuid,
    /// Owning company; every read and write is scoped by it.
    pub company_id: Uuid,
    pub uploaded_by: Option<Uuid>,
    pub title: String,
    pub layout: String,
    pub floors: String,
    pub total_area: f64,
    pub site_area: f64,
    pub direction: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    pub original_filename: String,
    /// Blob storage path of the PDF, relative to the storage root.
    pub pdf_path: Option<String>,
    /// BLAKE3 hash of the stored PDF.
    pub content_hash: Option<String>,
    /// Optimistic-concurrency token, incremented on every mutation.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn fields(&self) -> PlanFields {
        PlanFields {
            total_area: self.total_area,
            layout: self.layout.clone(),
            floors: self.floors.clone(),
            direction: self.direction.clone(),
            site_area: self.site_area,
            features: self.features.clone(),
        }
    }
}

/// Request for inserting a new plan.
///
/// The id is chosen by the caller so the PDF can be stored under it before
/// the record is written.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub id: Uuid,
    pub company_id: Uuid,
    pub uploaded_by: Option<Uuid>,
    pub metadata: PlanMetadata,
    pub pdf_path: Option<String>,
    pub content_hash: Option<String>,
}

impl NewPlan {
    /// Materialize the record as it looks right after insertion.
    pub fn into_plan(self, now: DateTime<Utc>) -> Plan {
        Plan {
            id: self.id,
            company_id: self.company_id,
            uploaded_by: self.uploaded_by,
            title: self.metadata.title,
            layout: self.metadata.layout,
            floors: self.metadata.floors,
            total_area: self.metadata.total_area,
            site_area: self.metadata.site_area,
            direction: self.metadata.direction,
            features: self.metadata.features,
            favorite: false,
            original_filename: self.metadata.original_filename,
            pdf_path: self.pdf_path,
            content_hash: self.content_hash,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}
