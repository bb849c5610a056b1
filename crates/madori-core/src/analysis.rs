//! Decoding of AI-assisted PDF analysis responses.
//!
//! An external model reads a plan PDF and answers with a JSON object
//! describing the plan. Model output is loosely shaped: it may be wrapped in a
//! markdown fence, use camelCase or snake_case keys, give areas as strings or
//! in square meters, and spell tokens informally. Every field is decoded on
//! its own with an explicit fallback, so one bad field never discards the
//! rest:
//!
//! | Field | Accepted | Fallback |
//! |-------|----------|----------|
//! | `layout`, `floors`, `direction` | canonical or loose spelling | `-` + warning |
//! | `total_area`, `site_area` | number, `"32.5坪"`, `"105㎡"`, or `*_m2` keys | `0` + warning |
//! | `features` | array of strings or a delimited string | empty |
//! | `confidence` | number or numeric string, clamped to `[0, 1]` | `0` |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::defaults::UNKNOWN;
use crate::error::{Error, Result};
use crate::filename::AreaToken;
use crate::models::{PlanFields, PlanMetadata};
use crate::vocabulary::{square_meters_to_tsubo, Direction, Floors, Layout};

/// Decoded analysis of a plan PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlanAnalysis {
    pub fields: PlanFields,
    /// Model-reported confidence in `[0, 1]`.
    pub confidence: f64,
    pub summary: Option<String>,
    /// One entry per field that fell back to its default.
    pub warnings: Vec<String>,
}

impl PlanAnalysis {
    pub fn into_metadata(self, original_filename: impl Into<String>) -> PlanMetadata {
        PlanMetadata::from_fields(self.fields, original_filename)
    }
}

/// Decode a raw model response into a [`PlanAnalysis`].
///
/// Fails only when the response holds no JSON object at all.
pub fn decode_analysis(raw: &str) -> Result<PlanAnalysis> {
    let body = extract_json_object(raw).ok_or_else(|| {
        Error::InvalidInput("Analysis response contains no JSON object".to_string())
    })?;
    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| Error::InvalidInput(format!("Analysis response is not valid JSON: {}", e)))?;
    let obj = value.as_object().ok_or_else(|| {
        Error::InvalidInput("Analysis response is not a JSON object".to_string())
    })?;

    let mut warnings = Vec::new();

    let layout = decode_token(obj, &["layout"], "layout", Layout::parse_loose, &mut warnings);
    let floors = decode_token(
        obj,
        &["floors", "stories"],
        "floors",
        Floors::parse_loose,
        &mut warnings,
    );
    let direction = decode_token(
        obj,
        &["direction", "road_direction", "roadDirection"],
        "direction",
        Direction::parse_loose,
        &mut warnings,
    );
    let total_area = decode_area(
        obj,
        &["total_area", "totalArea", "building_area", "buildingArea"],
        &["total_area_m2", "totalAreaM2", "building_area_m2", "buildingAreaM2"],
        "total_area",
        &mut warnings,
    );
    let site_area = decode_area(
        obj,
        &["site_area", "siteArea"],
        &["site_area_m2", "siteAreaM2"],
        "site_area",
        &mut warnings,
    );

    Ok(PlanAnalysis {
        fields: PlanFields {
            total_area,
            layout,
            floors,
            direction,
            site_area,
            features: decode_features(obj),
        },
        confidence: decode_confidence(obj),
        summary: lookup(obj, &["summary", "description"])
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        warnings,
    })
}

/// Strip markdown fences and surrounding prose, returning the outermost `{...}`.
fn extract_json_object(raw: &str) -> Option<&str> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    (start < end).then(|| &cleaned[start..=end])
}

fn lookup<'a>(obj: &'a Map<String, JsonValue>, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn decode_token<T: std::fmt::Display>(
    obj: &Map<String, JsonValue>,
    keys: &[&str],
    label: &str,
    parse: fn(&str) -> Option<T>,
    warnings: &mut Vec<String>,
) -> String {
    let Some(value) = lookup(obj, keys) else {
        return UNKNOWN.to_string();
    };
    match value.as_str().map(str::trim) {
        Some(token) if token.is_empty() || token == UNKNOWN => UNKNOWN.to_string(),
        Some(token) => match parse(token) {
            Some(parsed) => parsed.to_string(),
            None => {
                warnings.push(format!("{}: unrecognized value '{}'", label, token));
                UNKNOWN.to_string()
            }
        },
        None => {
            warnings.push(format!("{}: expected a string, got {}", label, value));
            UNKNOWN.to_string()
        }
    }
}

fn decode_area(
    obj: &Map<String, JsonValue>,
    tsubo_keys: &[&str],
    square_meter_keys: &[&str],
    label: &str,
    warnings: &mut Vec<String>,
) -> f64 {
    let (value, in_square_meters) = match lookup(obj, tsubo_keys) {
        Some(value) => (value, false),
        None => match lookup(obj, square_meter_keys) {
            Some(value) => (value, true),
            None => return 0.0,
        },
    };

    let decoded = match value {
        JsonValue::Number(n) => n.as_f64().map(|v| (v, in_square_meters)),
        JsonValue::String(s) => {
            let s = s.trim();
            let is_square_meters = in_square_meters
                || ["㎡", "m²", "m2", "平米"].iter().any(|unit| s.ends_with(*unit));
            let numeric = s
                .trim_end_matches("㎡")
                .trim_end_matches("m²")
                .trim_end_matches("m2")
                .trim_end_matches("平米");
            AreaToken::classify(numeric)
                .ok()
                .map(|token| (token.tsubo(), is_square_meters))
        }
        _ => None,
    };

    match decoded {
        Some((v, _)) if !v.is_finite() || v < 0.0 => {
            warnings.push(format!("{}: out of range value {}", label, v));
            0.0
        }
        Some((v, true)) => square_meters_to_tsubo(v),
        Some((v, false)) => v,
        None => {
            warnings.push(format!("{}: unreadable value {}", label, value));
            0.0
        }
    }
}

fn decode_features(obj: &Map<String, JsonValue>) -> Vec<String> {
    let features: Vec<String> = match lookup(obj, &["features", "tags"]) {
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(JsonValue::as_str)
            .map(String::from)
            .collect(),
        Some(JsonValue::String(s)) => s
            .split(['、', ',', '，', '/'])
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    };
    features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

fn decode_confidence(obj: &Map<String, JsonValue>) -> f64 {
    let raw = match lookup(obj, &["confidence"]) {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(0.0)
}
