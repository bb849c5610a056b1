//! Search filter types for plan queries.
//!
//! The evaluation itself lives in `madori-search`; this module only defines
//! the filter specification so the API, the search engine and the tests share
//! one type.

use serde::{Deserialize, Serialize};

/// Multi-field plan filter.
///
/// Every field is optional and unspecified fields impose no constraint.
///
/// # Filtering Logic
///
/// - `layout`, `floors`, `direction`: exact, case-sensitive equality
/// - `min_area` / `max_area`: inclusive bounds on `total_area`
/// - `min_site_area` / `max_site_area`: inclusive bounds on `site_area`
/// - `features`: AND logic - every requested feature must match one of the
///   plan's features (substring match in either direction)
/// - `favorite_only`: only favorited plans
///
/// # Example
///
/// ```
/// use madori_core::SearchFilters;
///
/// let filters = SearchFilters::new()
///     .with_layout("3LDK")
///     .with_area_range(Some(30.0), Some(40.0))
///     .require_feature("吹き抜け");
///
/// assert!(!filters.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<String>,

    /// Inclusive lower bound on building area (tsubo).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_area: Option<f64>,

    /// Inclusive upper bound on building area (tsubo).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_area: Option<f64>,

    /// Inclusive lower bound on site area (tsubo).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_site_area: Option<f64>,

    /// Inclusive upper bound on site area (tsubo).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_site_area: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    /// Required features (AND logic).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    /// Restrict to favorited plans.
    #[serde(default)]
    pub favorite_only: bool,
}

impl SearchFilters {
    /// Create an empty filter (matches every plan).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_floors(mut self, floors: impl Into<String>) -> Self {
        self.floors = Some(floors.into());
        self
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Set inclusive building-area bounds.
    pub fn with_area_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_area = min;
        self.max_area = max;
        self
    }

    /// Set inclusive site-area bounds.
    pub fn with_site_area_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_site_area = min;
        self.max_site_area = max;
        self
    }

    /// Add a required feature (AND logic).
    pub fn require_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    pub fn favorites_only(mut self, only: bool) -> Self {
        self.favorite_only = only;
        self
    }

    /// Layout constraint, if one is set. An empty string counts as unset.
    pub fn layout_constraint(&self) -> Option<&str> {
        active_token(&self.layout)
    }

    /// Floors constraint, if one is set. An empty string counts as unset.
    pub fn floors_constraint(&self) -> Option<&str> {
        active_token(&self.floors)
    }

    /// Direction constraint, if one is set. An empty string counts as unset.
    pub fn direction_constraint(&self) -> Option<&str> {
        active_token(&self.direction)
    }

    /// Check if the filter has no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.layout_constraint().is_none()
            && self.floors_constraint().is_none()
            && self.direction_constraint().is_none()
            && self.min_area.is_none()
            && self.max_area.is_none()
            && self.min_site_area.is_none()
            && self.max_site_area.is_none()
            && self.features.is_empty()
            && !self.favorite_only
    }
}

fn active_token(token: &Option<String>) -> Option<&str> {
    token.as_deref().filter(|t| !t.is_empty())
}
