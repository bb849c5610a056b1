//! Filter evaluation and ordering over a plan collection.
//!
//! A plan is included iff every specified filter holds:
//!
//! | Filter | Condition |
//! |--------|-----------|
//! | `layout`, `floors`, `direction` | exact equality |
//! | `min_area` / `max_area` | `min <= total_area <= max` |
//! | `min_site_area` / `max_site_area` | `min <= site_area <= max` |
//! | `features` | every requested feature matches some plan feature |
//! | `favorite_only` | `favorite == true` |
//!
//! Results are ordered by `created_at` descending. The sort is stable, so
//! plans with identical timestamps keep their input order.
//!
//! Inconsistent bounds (`min_area > max_area`) are not an error; they simply
//! match nothing.

use madori_core::{Plan, SearchFilters};
use tracing::trace;

use crate::features::has_all_features;

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

/// Evaluate the filter predicate for one plan.
pub fn matches_filters(plan: &Plan, filters: &SearchFilters) -> bool {
    if let Some(layout) = filters.layout_constraint() {
        if plan.layout != layout {
            return false;
        }
    }
    if let Some(floors) = filters.floors_constraint() {
        if plan.floors != floors {
            return false;
        }
    }
    if !within(plan.total_area, filters.min_area, filters.max_area) {
        return false;
    }
    if !within(plan.site_area, filters.min_site_area, filters.max_site_area) {
        return false;
    }
    if let Some(direction) = filters.direction_constraint() {
        if plan.direction != direction {
            return false;
        }
    }
    if !has_all_features(&plan.features, &filters.features) {
        return false;
    }
    !filters.favorite_only || plan.favorite
}

/// Filter `plans` and return the matches, newest first.
///
/// The input is never modified; matching plans are cloned into the result.
pub fn search_plans(plans: &[Plan], filters: &SearchFilters) -> Vec<Plan> {
    let mut results: Vec<Plan> = plans
        .iter()
        .filter(|plan| matches_filters(plan, filters))
        .cloned()
        .collect();
    results.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    trace!(
        input_count = plans.len(),
        result_count = results.len(),
        "Plan filter evaluated"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use madori_core::{parse_filename, NewPlan};
    use uuid::Uuid;

    fn plan(filename: &str, age_days: i64) -> Plan {
        let created = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap() - Duration::days(age_days);
        NewPlan {
            id: Uuid::new_v4(),
            company_id: Uuid::nil(),
            uploaded_by: None,
            metadata: parse_filename(filename).unwrap(),
            pdf_path: None,
            content_hash: None,
        }
        .into_plan(created)
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let p = plan("30坪_3LDK_2階建て_南_50坪.pdf", 0);
        assert!(matches_filters(&p, &SearchFilters::new()));
    }

    #[test]
    fn test_exact_token_match_is_case_sensitive() {
        let p = plan("30坪_3LDK_2階建て_南_50坪.pdf", 0);
        assert!(matches_filters(&p, &SearchFilters::new().with_layout("3LDK")));
        assert!(!matches_filters(&p, &SearchFilters::new().with_layout("3ldk")));
        assert!(!matches_filters(&p, &SearchFilters::new().with_floors("平屋")));
        assert!(!matches_filters(&p, &SearchFilters::new().with_direction("南東")));
    }

    #[test]
    fn test_empty_token_is_unset_but_whitespace_is_not() {
        let p = plan("30坪_3LDK_2階建て_南_50坪.pdf", 0);
        assert!(matches_filters(&p, &SearchFilters::new().with_layout("")));
        assert!(!matches_filters(&p, &SearchFilters::new().with_layout("  ")));
        assert!(search_plans(&[p], &SearchFilters::new().with_direction(" ")).is_empty());
    }

    #[test]
    fn test_area_bounds_are_inclusive() {
        let p = plan("30坪_3LDK_2階建て_南_50坪.pdf", 0);
        let exact = SearchFilters::new().with_area_range(Some(30.0), Some(30.0));
        assert!(matches_filters(&p, &exact));

        let site = SearchFilters::new().with_site_area_range(Some(50.0), Some(50.0));
        assert!(matches_filters(&p, &site));

        let above = SearchFilters::new().with_area_range(Some(30.5), None);
        assert!(!matches_filters(&p, &above));
    }

    #[test]
    fn test_zero_max_area_is_a_constraint() {
        let known = plan("30坪_3LDK_2階建て_南_50坪.pdf", 0);
        let unknown = plan("-_3LDK_2階建て_南_50坪.pdf", 0);
        let filters = SearchFilters::new().with_area_range(None, Some(0.0));
        assert!(!matches_filters(&known, &filters));
        assert!(matches_filters(&unknown, &filters));
    }

    #[test]
    fn test_inverted_bounds_match_nothing() {
        let p = plan("30坪_3LDK_2階建て_南_50坪.pdf", 0);
        let filters = SearchFilters::new().with_area_range(Some(40.0), Some(20.0));
        assert!(!matches_filters(&p, &filters));
    }

    #[test]
    fn test_favorite_only() {
        let mut p = plan("30坪_3LDK_2階建て_南_50坪.pdf", 0);
        let filters = SearchFilters::new().favorites_only(true);
        assert!(!matches_filters(&p, &filters));
        p.favorite = true;
        assert!(matches_filters(&p, &filters));
    }

    #[test]
    fn test_sorted_newest_first() {
        let plans = vec![
            plan("30坪_3LDK_2階建て_南_50坪.pdf", 5),
            plan("31坪_3LDK_2階建て_南_50坪.pdf", 1),
            plan("32坪_3LDK_2階建て_南_50坪.pdf", 3),
        ];
        let results = search_plans(&plans, &SearchFilters::new());
        let areas: Vec<f64> = results.iter().map(|p| p.total_area).collect();
        assert_eq!(areas, vec![31.0, 32.0, 30.0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let plans = vec![
            plan("30坪_3LDK_2階建て_南_50坪.pdf", 2),
            plan("31坪_3LDK_2階建て_南_50坪.pdf", 2),
            plan("32坪_3LDK_2階建て_南_50坪.pdf", 2),
        ];
        let results = search_plans(&plans, &SearchFilters::new());
        assert_eq!(results, plans);
    }
}
