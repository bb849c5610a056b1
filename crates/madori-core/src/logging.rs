//! Structured logging field names shared by all madori crates.
//!
//! Every `tracing` event that carries one of these concepts uses the constant
//! here as its field name, so log queries work the same across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, uploads, deletes, batch summaries |
//! | DEBUG | Rejected filenames, decision points, config choices |
//! | TRACE | Per-plan filter decisions |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the request layer (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "search", "db", "storage", "codec"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "filename", "query", "pool", "filesystem"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "parse", "search", "upload", "toggle_favorite"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Plan UUID being operated on.
pub const PLAN_ID: &str = "plan_id";

/// Tenant (company) UUID scoping the operation.
pub const COMPANY_ID: &str = "company_id";

/// Acting user UUID.
pub const USER_ID: &str = "user_id";

/// Filename handed to the codec or the upload handler.
pub const FILENAME: &str = "filename";

/// Blob storage path.
pub const STORAGE_PATH: &str = "storage_path";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of plans returned by a search or listing.
pub const RESULT_COUNT: &str = "result_count";

/// Number of inputs (plans scanned, filenames in a batch).
pub const INPUT_COUNT: &str = "input_count";

/// Number of failed entries in a batch.
pub const FAILURE_COUNT: &str = "failure_count";

/// Payload size in bytes.
pub const SIZE_BYTES: &str = "size_bytes";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Machine-readable error kind (e.g. codec failure kind).
pub const ERROR_KIND: &str = "error_kind";
