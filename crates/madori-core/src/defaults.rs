//! Centralized default constants for madori.
//!
//! Grammar tokens of the canonical plan filename, unit conversions, and
//! service limits. Crates reference these instead of repeating literals.

// =============================================================================
// FILENAME GRAMMAR
// =============================================================================

/// Sentinel token meaning "value not provided".
pub const UNKNOWN: &str = "-";

/// Tsubo unit suffix on area segments.
pub const TSUBO_SUFFIX: &str = "坪";

/// Suffix appended to the direction in generated titles ("south road").
pub const ROAD_SUFFIX: &str = "道路";

/// Title used when every titled field is unknown ("housing plan").
pub const TITLE_FALLBACK: &str = "住宅プラン";

/// File extension stripped before parsing and appended on generation.
pub const PDF_EXTENSION: &str = ".pdf";

/// Separator between top-level filename fields.
pub const FIELD_SEPARATOR: char = '_';

/// Separator between feature tags inside the feature segment.
pub const FEATURE_SEPARATOR: char = '-';

/// Minimum number of `_`-separated segments in a valid filename.
pub const MIN_SEGMENTS: usize = 5;

// =============================================================================
// UNITS
// =============================================================================

/// Square meters per tsubo.
pub const SQUARE_METERS_PER_TSUBO: f64 = 3.30579;

// =============================================================================
// STORAGE / UPLOAD
// =============================================================================

/// Default maximum accepted PDF upload size (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Maximum stored filename length in bytes.
pub const MAX_FILENAME_BYTES: usize = 255;

/// Default directory for stored plan PDFs.
pub const FILE_STORAGE_PATH: &str = "/var/lib/madori/files";

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 3000;

/// Default maximum database connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;
