//! # madori-search
//!
//! Plan query engine for the madori floor-plan catalog.
//!
//! This crate provides:
//! - The filter predicate and ordering over a plan collection (`search_plans`)
//! - Lenient feature-tag matching (substring in either direction)
//! - A repository-backed engine that searches one company's catalog
//!
//! ## Example
//!
//! ```ignore
//! use madori_search::{PlanSearch, PlanSearchEngine, SearchFilters};
//!
//! let engine = PlanSearchEngine::new(repo);
//!
//! let results = engine
//!     .search(
//!         company_id,
//!         &SearchFilters::new()
//!             .with_layout("3LDK")
//!             .with_area_range(Some(30.0), Some(40.0))
//!             .require_feature("吹き抜け"),
//!     )
//!     .await?;
//! ```

pub mod engine;
pub mod features;
pub mod query;

// Re-export core types
pub use madori_core::*;

pub use engine::{PlanSearch, PlanSearchEngine};
pub use features::{feature_matches, has_all_features};
pub use query::{matches_filters, search_plans};
