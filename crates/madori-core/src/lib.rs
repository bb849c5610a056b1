//! # madori-core
//!
//! Core types, traits, and the filename codec for the madori floor-plan catalog.
//!
//! This crate provides the plan data model, the canonical filename grammar
//! (`parse_filename` / `generate_filename`), the closed vocabularies used by
//! plan metadata, upload-level validation, and the repository trait that the
//! persistence crate implements.

pub mod analysis;
pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod filename;
pub mod logging;
pub mod models;
pub mod search;
pub mod traits;
pub mod validation;
pub mod vocabulary;

// Re-export commonly used types at crate root
pub use analysis::{decode_analysis, PlanAnalysis};
pub use error::{Error, Result};
pub use file_safety::{sanitize_filename, validate_plan_pdf, ValidationResult};
pub use filename::{
    build_title, generate_filename, parse_filename, parse_multiple_filenames, validate_filename,
    AreaToken, FilenameError, FilenameErrorKind,
};
pub use models::*;
pub use search::SearchFilters;
pub use traits::*;
pub use validation::{validate_for_upload, UpdatePlanRequest, UploadMetadata};
pub use vocabulary::{
    square_meters_to_tsubo, tsubo_to_square_meters, Direction, Floors, Layout,
};
