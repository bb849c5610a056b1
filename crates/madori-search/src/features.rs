//! Feature-tag matching.
//!
//! Feature tags are free text, so a requested feature matches a stored one
//! when either contains the other: `吹き抜け` matches `リビング吹き抜け` and
//! the reverse. This is deliberately loose; a one-character request such as
//! `行` matches any tag containing that character.

/// True when `requested` and `stored` overlap by substring in either direction.
pub fn feature_matches(requested: &str, stored: &str) -> bool {
    stored.contains(requested) || requested.contains(stored)
}

/// True when every requested feature matches at least one of the plan's features.
///
/// An empty request matches every plan.
pub fn has_all_features(plan_features: &[String], requested: &[String]) -> bool {
    requested.iter().all(|wanted| {
        plan_features
            .iter()
            .any(|stored| feature_matches(wanted, stored))
    })
}
