//! Upload- and edit-level validation of plan metadata.
//!
//! The filename parser hard-validates floors and direction but stores the
//! layout verbatim. Before a plan is persisted, every token must belong to
//! its closed vocabulary (or be the `-` sentinel) and areas must be finite
//! and non-negative. Structured metadata forms and partial edits go through
//! the same checks, and the title is regenerated whenever fields change.

use serde::{Deserialize, Serialize};

use crate::defaults::UNKNOWN;
use crate::error::{Error, Result};
use crate::filename::build_title;
use crate::models::{Plan, PlanFields, PlanMetadata};
use crate::vocabulary::{is_valid_direction, is_valid_floors, is_valid_layout};

// =============================================================================
// FIELD CHECKS
// =============================================================================

fn check_layout(layout: &str) -> Result<()> {
    if is_valid_layout(layout) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Invalid layout '{}': expected 2LDK, 3LDK, 4LDK, 5LDK, 6LDK or '-'",
            layout
        )))
    }
}

fn check_floors(floors: &str) -> Result<()> {
    if is_valid_floors(floors) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Invalid floors '{}': expected 平屋, 2階建て, 3階建て or '-'",
            floors
        )))
    }
}

fn check_direction(direction: &str) -> Result<()> {
    if is_valid_direction(direction) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Invalid direction '{}': expected 東, 西, 南, 北, 北東, 北西, 南東, 南西 or '-'",
            direction
        )))
    }
}

fn check_area(label: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!(
            "Invalid {} {}: must be a non-negative number of tsubo",
            label, value
        )))
    }
}

fn check_fields(fields: &PlanFields) -> Result<()> {
    check_area("building area", fields.total_area)?;
    check_layout(&fields.layout)?;
    check_floors(&fields.floors)?;
    check_direction(&fields.direction)?;
    check_area("site area", fields.site_area)?;
    Ok(())
}

/// Trimmed token, or the sentinel when absent or blank.
fn token_or_unknown(token: Option<String>) -> String {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn clean_features(features: Vec<String>) -> Vec<String> {
    features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

/// Check filename-derived metadata before it is persisted.
///
/// This is where the closed layout set is enforced.
pub fn validate_for_upload(metadata: &PlanMetadata) -> Result<()> {
    check_fields(&metadata.fields())
}

// =============================================================================
// STRUCTURED UPLOAD METADATA
// =============================================================================

/// Metadata entered by hand alongside an upload, instead of a parseable filename.
///
/// Missing tokens become `-` and missing areas become `0` (unknown).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadMetadata {
    #[serde(default)]
    pub total_area: Option<f64>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub floors: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub site_area: Option<f64>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl UploadMetadata {
    /// Validate and convert into plan metadata with a derived title.
    pub fn into_metadata(self, original_filename: impl Into<String>) -> Result<PlanMetadata> {
        let fields = PlanFields {
            total_area: self.total_area.unwrap_or(0.0),
            layout: token_or_unknown(self.layout),
            floors: token_or_unknown(self.floors),
            direction: token_or_unknown(self.direction),
            site_area: self.site_area.unwrap_or(0.0),
            features: clean_features(self.features),
        };
        check_fields(&fields)?;
        Ok(PlanMetadata::from_fields(fields, original_filename))
    }
}

// =============================================================================
// PARTIAL EDITS
// =============================================================================

/// Partial edit of a plan's metadata.
///
/// `version`, when present, must equal the stored version for the edit to be
/// applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdatePlanRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl UpdatePlanRequest {
    /// True when no metadata field would change.
    pub fn is_empty(&self) -> bool {
        self.total_area.is_none()
            && self.layout.is_none()
            && self.floors.is_none()
            && self.direction.is_none()
            && self.site_area.is_none()
            && self.features.is_none()
    }
}

impl Plan {
    /// Apply an edit to the metadata fields and rebuild the title.
    ///
    /// Validation happens on the merged result, so the plan is left untouched
    /// when the edit is rejected. Version bookkeeping is the repository's job.
    pub fn apply_update(&mut self, req: &UpdatePlanRequest) -> Result<()> {
        let current = self.fields();
        let merged = PlanFields {
            total_area: req.total_area.unwrap_or(current.total_area),
            layout: req
                .layout
                .clone()
                .map(|t| token_or_unknown(Some(t)))
                .unwrap_or(current.layout),
            floors: req
                .floors
                .clone()
                .map(|t| token_or_unknown(Some(t)))
                .unwrap_or(current.floors),
            direction: req
                .direction
                .clone()
                .map(|t| token_or_unknown(Some(t)))
                .unwrap_or(current.direction),
            site_area: req.site_area.unwrap_or(current.site_area),
            features: req
                .features
                .clone()
                .map(clean_features)
                .unwrap_or(current.features),
        };
        check_fields(&merged)?;

        self.title = build_title(&merged);
        self.total_area = merged.total_area;
        self.layout = merged.layout;
        self.floors = merged.floors;
        self.direction = merged.direction;
        self.site_area = merged.site_area;
        self.features = merged.features;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filename::parse_filename;
    use crate::models::NewPlan;
    use chrono::Utc;
    use uuid::Uuid;

    fn plan() -> Plan {
        NewPlan {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            uploaded_by: None,
            metadata: parse_filename("32.5坪_3LDK_2階建て_南_50坪_吹き抜け-WIC.pdf").unwrap(),
            pdf_path: None,
            content_hash: None,
        }
        .into_plan(Utc::now())
    }

    #[test]
    fn test_upload_rejects_unknown_layout() {
        let metadata = parse_filename("20坪_1K_平屋_南_30坪.pdf").unwrap();
        let err = validate_for_upload(&metadata).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("1K")));
    }

    #[test]
    fn test_upload_accepts_sentinel_layout() {
        let metadata = parse_filename("-_-_-_-_-.pdf").unwrap();
        assert!(validate_for_upload(&metadata).is_ok());
    }

    #[test]
    fn test_upload_metadata_defaults_to_unknown() {
        let metadata = UploadMetadata {
            layout: Some("4LDK".to_string()),
            ..Default::default()
        }
        .into_metadata("scan.pdf")
        .unwrap();

        assert_eq!(metadata.layout, "4LDK");
        assert_eq!(metadata.floors, "-");
        assert_eq!(metadata.direction, "-");
        assert_eq!(metadata.total_area, 0.0);
        assert_eq!(metadata.title, "4LDK");
        assert_eq!(metadata.original_filename, "scan.pdf");
    }

    #[test]
    fn test_upload_metadata_cleans_tokens_and_features() {
        let metadata = UploadMetadata {
            total_area: Some(30.0),
            layout: Some(" 3LDK ".to_string()),
            floors: Some("".to_string()),
            direction: Some("北".to_string()),
            site_area: Some(55.5),
            features: vec![" WIC ".to_string(), "".to_string(), "ロフト".to_string()],
        }
        .into_metadata("scan.pdf")
        .unwrap();

        assert_eq!(metadata.layout, "3LDK");
        assert_eq!(metadata.floors, "-");
        assert_eq!(metadata.features, vec!["WIC", "ロフト"]);
        assert_eq!(metadata.title, "30坪 3LDK 北道路");
    }

    #[test]
    fn test_upload_metadata_rejects_negative_area() {
        let err = UploadMetadata {
            site_area: Some(-1.0),
            ..Default::default()
        }
        .into_metadata("scan.pdf")
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_upload_metadata_rejects_bad_direction() {
        let err = UploadMetadata {
            direction: Some("南向き".to_string()),
            ..Default::default()
        }
        .into_metadata("scan.pdf")
        .unwrap_err();
        assert!(err.to_string().contains("南向き"));
    }

    #[test]
    fn test_apply_update_regenerates_title() {
        let mut plan = plan();
        let req = UpdatePlanRequest {
            layout: Some("4LDK".to_string()),
            floors: Some("平屋".to_string()),
            ..Default::default()
        };
        plan.apply_update(&req).unwrap();

        assert_eq!(plan.layout, "4LDK");
        assert_eq!(plan.floors, "平屋");
        assert_eq!(plan.title, "32.5坪 4LDK 平屋 南道路");
        assert_eq!(plan.features, vec!["吹き抜け", "WIC"]);
    }

    #[test]
    fn test_apply_update_to_unknown_drops_title_part() {
        let mut plan = plan();
        let req = UpdatePlanRequest {
            total_area: Some(0.0),
            direction: Some("-".to_string()),
            ..Default::default()
        };
        plan.apply_update(&req).unwrap();
        assert_eq!(plan.title, "3LDK 2階建て");
    }

    #[test]
    fn test_rejected_update_leaves_plan_untouched() {
        let mut plan = plan();
        let before = plan.clone();
        let req = UpdatePlanRequest {
            layout: Some("4LDK".to_string()),
            direction: Some("上".to_string()),
            ..Default::default()
        };
        assert!(plan.apply_update(&req).is_err());
        assert_eq!(plan, before);
    }

    #[test]
    fn test_update_request_is_empty() {
        assert!(UpdatePlanRequest::default().is_empty());
        let only_version = UpdatePlanRequest {
            version: Some(2),
            ..Default::default()
        };
        assert!(only_version.is_empty());
        let with_features = UpdatePlanRequest {
            features: Some(Vec::new()),
            ..Default::default()
        };
        assert!(!with_features.is_empty());
    }
}
