//! Canonical plan filename grammar.
//!
//! Plan PDFs are named by staff using a fixed field order:
//!
//! ```text
//! <buildingArea>_<layout>_<floors>_<direction>_<siteArea>_<feature1-feature2-...>.pdf
//! ```
//!
//! e.g. `32.5坪_3LDK_2階建て_南_50坪_吹き抜け-WIC-ロフト.pdf`. Any field may be
//! the unknown sentinel `-` (areas also accept `-坪`).
//!
//! Parsing is total: every failure comes back as a [`FilenameError`] tagged with
//! the segment that failed, and a parse either fully succeeds or fully fails.
//!
//! # Example
//!
//! ```
//! use madori_core::{generate_filename, parse_filename};
//!
//! let metadata = parse_filename("28坪_2LDK_平屋_北_45坪.pdf").unwrap();
//! assert_eq!(metadata.title, "28坪 2LDK 平屋 北道路");
//! assert!(metadata.features.is_empty());
//!
//! assert_eq!(generate_filename(&metadata.fields()), "28坪_2LDK_平屋_北_45坪.pdf");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::defaults::{
    FEATURE_SEPARATOR, FIELD_SEPARATOR, MIN_SEGMENTS, PDF_EXTENSION, ROAD_SUFFIX, TITLE_FALLBACK,
    TSUBO_SUFFIX, UNKNOWN,
};
use crate::models::{PlanFields, PlanMetadata};
use crate::vocabulary::{is_valid_direction, is_valid_floors};

/// First contiguous decimal number in an area segment.
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("number pattern is valid"));

// =============================================================================
// ERRORS
// =============================================================================

/// Which part of the grammar rejected the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum FilenameErrorKind {
    /// Fewer than five `_`-separated segments.
    InvalidFormat,
    InvalidBuildingArea,
    InvalidFloors,
    InvalidDirection,
    InvalidSiteArea,
    /// A numeric segment matched the grammar but could not be converted.
    ParseError,
}

impl std::fmt::Display for FilenameErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidFormat => "InvalidFormat",
            Self::InvalidBuildingArea => "InvalidBuildingArea",
            Self::InvalidFloors => "InvalidFloors",
            Self::InvalidDirection => "InvalidDirection",
            Self::InvalidSiteArea => "InvalidSiteArea",
            Self::ParseError => "ParseError",
        };
        f.write_str(s)
    }
}

/// A rejected filename.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[error("{message}")]
pub struct FilenameError {
    pub kind: FilenameErrorKind,
    /// Human-readable message naming the failing segment.
    pub message: String,
}

impl FilenameError {
    fn new(kind: FilenameErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

// =============================================================================
// AREA SEGMENTS
// =============================================================================

/// Decoded area segment: the sentinel, or a value in tsubo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaToken {
    Unknown,
    Tsubo(f64),
}

/// Why an area segment could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaFault {
    /// Not the sentinel and no number in it.
    NoNumber,
    /// A number matched but did not convert to a finite value.
    Unparseable(String),
}

impl AreaToken {
    /// Classify an area segment: sentinel check first, number extraction second.
    pub fn classify(segment: &str) -> Result<Self, AreaFault> {
        let trimmed = segment.trim();
        let cleaned = trimmed.strip_suffix(TSUBO_SUFFIX).unwrap_or(trimmed);
        if cleaned == UNKNOWN {
            return Ok(Self::Unknown);
        }

        let digits = NUMBER_PATTERN
            .find(cleaned)
            .ok_or(AreaFault::NoNumber)?
            .as_str();
        let value: f64 = digits
            .parse()
            .map_err(|e: std::num::ParseFloatError| AreaFault::Unparseable(e.to_string()))?;
        if !value.is_finite() {
            return Err(AreaFault::Unparseable(format!(
                "{} is out of range",
                digits
            )));
        }
        Ok(Self::Tsubo(value))
    }

    /// Area in tsubo, `0` for unknown.
    pub fn tsubo(&self) -> f64 {
        match self {
            Self::Unknown => 0.0,
            Self::Tsubo(value) => *value,
        }
    }
}

fn parse_area(
    segment: &str,
    filename: &str,
    label: &str,
    kind: FilenameErrorKind,
) -> Result<f64, FilenameError> {
    match AreaToken::classify(segment) {
        Ok(token) => Ok(token.tsubo()),
        Err(AreaFault::NoNumber) => Err(FilenameError::new(
            kind,
            format!(
                "Invalid {} '{}' in '{}': expected a number of tsubo or '-'",
                label,
                segment.trim(),
                filename
            ),
        )),
        Err(AreaFault::Unparseable(reason)) => Err(FilenameError::new(
            FilenameErrorKind::ParseError,
            format!("Failed to parse '{}': {}", filename, reason),
        )),
    }
}

// =============================================================================
// PARSE
// =============================================================================

/// Parse a canonical plan filename into metadata.
pub fn parse_filename(filename: &str) -> Result<PlanMetadata, FilenameError> {
    parse_segments(filename).map_err(|e| {
        debug!(
            subsystem = "codec",
            component = "filename",
            op = "parse",
            filename = %filename,
            error_kind = %e.kind,
            "Filename rejected"
        );
        e
    })
}

fn parse_segments(filename: &str) -> Result<PlanMetadata, FilenameError> {
    let stem = strip_pdf_suffix(filename);
    let segments: Vec<&str> = stem.split(FIELD_SEPARATOR).collect();
    if segments.len() < MIN_SEGMENTS {
        return Err(FilenameError::new(
            FilenameErrorKind::InvalidFormat,
            format!(
                "Invalid filename format '{}': expected at least {} '{}'-separated segments, found {}",
                filename,
                MIN_SEGMENTS,
                FIELD_SEPARATOR,
                segments.len()
            ),
        ));
    }

    let total_area = parse_area(
        segments[0],
        filename,
        "building area",
        FilenameErrorKind::InvalidBuildingArea,
    )?;

    let layout = segments[1].trim();

    let floors = segments[2].trim();
    if !is_valid_floors(floors) {
        return Err(FilenameError::new(
            FilenameErrorKind::InvalidFloors,
            format!(
                "Invalid floors '{}' in '{}': expected 平屋, 2階建て, 3階建て or '-'",
                floors, filename
            ),
        ));
    }

    let direction = segments[3].trim();
    if !is_valid_direction(direction) {
        return Err(FilenameError::new(
            FilenameErrorKind::InvalidDirection,
            format!(
                "Invalid direction '{}' in '{}': expected 東, 西, 南, 北, 北東, 北西, 南東, 南西 or '-'",
                direction, filename
            ),
        ));
    }

    let site_area = parse_area(
        segments[4],
        filename,
        "site area",
        FilenameErrorKind::InvalidSiteArea,
    )?;

    let feature_segment = segments[MIN_SEGMENTS..].join(FIELD_SEPARATOR.to_string().as_str());

    let fields = PlanFields {
        total_area,
        layout: layout.to_string(),
        floors: floors.to_string(),
        direction: direction.to_string(),
        site_area,
        features: split_features(&feature_segment),
    };
    Ok(PlanMetadata::from_fields(fields, filename))
}

/// Parse each filename independently, preserving order.
pub fn parse_multiple_filenames<S: AsRef<str>>(
    filenames: &[S],
) -> Vec<Result<PlanMetadata, FilenameError>> {
    filenames
        .iter()
        .map(|name| parse_filename(name.as_ref()))
        .collect()
}

/// True iff [`parse_filename`] would succeed.
pub fn validate_filename(filename: &str) -> bool {
    parse_filename(filename).is_ok()
}

/// Strip a trailing `.pdf`, ignoring ASCII case.
fn strip_pdf_suffix(filename: &str) -> &str {
    let split = filename.len().saturating_sub(PDF_EXTENSION.len());
    match filename.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(PDF_EXTENSION) => &filename[..split],
        _ => filename,
    }
}

fn split_features(segment: &str) -> Vec<String> {
    segment
        .split(FEATURE_SEPARATOR)
        .map(str::trim)
        .filter(|feature| !feature.is_empty())
        .map(String::from)
        .collect()
}

// =============================================================================
// TITLE / GENERATE
// =============================================================================

fn is_present(token: &str) -> bool {
    !token.is_empty() && token != UNKNOWN
}

/// Build the display title from the known fields.
///
/// Unknown fields are omitted; if nothing is known the title is `住宅プラン`.
pub fn build_title(fields: &PlanFields) -> String {
    let mut parts = Vec::with_capacity(4);

    if fields.total_area > 0.0 {
        parts.push(format!("{}{}", fields.total_area, TSUBO_SUFFIX));
    }
    let layout = fields.layout.trim();
    if is_present(layout) {
        parts.push(layout.to_string());
    }
    let floors = fields.floors.trim();
    if is_present(floors) {
        parts.push(floors.to_string());
    }
    let direction = fields.direction.trim();
    if is_present(direction) {
        parts.push(format!("{}{}", direction, ROAD_SUFFIX));
    }

    if parts.is_empty() {
        TITLE_FALLBACK.to_string()
    } else {
        parts.join(" ")
    }
}

/// Generate a canonical filename for new plan data.
///
/// Areas are always written as numbers with the `坪` suffix, so an unknown
/// area comes back from [`parse_filename`] as `0` rather than the sentinel.
pub fn generate_filename(fields: &PlanFields) -> String {
    let mut name = format!(
        "{}{tsubo}{sep}{}{sep}{}{sep}{}{sep}{}{tsubo}",
        fields.total_area,
        fields.layout,
        fields.floors,
        fields.direction,
        fields.site_area,
        tsubo = TSUBO_SUFFIX,
        sep = FIELD_SEPARATOR,
    );
    if !fields.features.is_empty() {
        name.push(FIELD_SEPARATOR);
        name.push_str(&fields.features.join(FEATURE_SEPARATOR.to_string().as_str()));
    }
    name.push_str(PDF_EXTENSION);
    name
}
