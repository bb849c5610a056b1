//! Closed vocabularies for plan metadata.
//!
//! Plan records keep `layout`, `floors` and `direction` as plain strings (the
//! filename codec stores what it reads), but every accepted value belongs to
//! one of the closed sets below or is the unknown sentinel `"-"`.
//!
//! `FromStr` accepts only the exact canonical tokens. The `parse_loose`
//! constructors accept the spellings an AI analyzer or a hand-filled form
//! tends to produce (`"３ldk"`, `"2階"`, `"南向き"`) and map them onto the
//! canonical token.

use serde::{Deserialize, Serialize};

use crate::defaults::{SQUARE_METERS_PER_TSUBO, UNKNOWN};

// =============================================================================
// LAYOUT
// =============================================================================

/// Room-count layout in LDK notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Layout {
    #[serde(rename = "2LDK")]
    TwoLdk,
    #[serde(rename = "3LDK")]
    ThreeLdk,
    #[serde(rename = "4LDK")]
    FourLdk,
    #[serde(rename = "5LDK")]
    FiveLdk,
    #[serde(rename = "6LDK")]
    SixLdk,
}

impl Layout {
    pub const ALL: [Layout; 5] = [
        Self::TwoLdk,
        Self::ThreeLdk,
        Self::FourLdk,
        Self::FiveLdk,
        Self::SixLdk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoLdk => "2LDK",
            Self::ThreeLdk => "3LDK",
            Self::FourLdk => "4LDK",
            Self::FiveLdk => "5LDK",
            Self::SixLdk => "6LDK",
        }
    }

    /// Accept full-width characters, any ASCII case, and inner spaces.
    pub fn parse_loose(s: &str) -> Option<Self> {
        let normalized: String = to_half_width(s)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        normalized.parse().ok()
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s)
            .ok_or_else(|| format!("Invalid layout: {}", s))
    }
}

// =============================================================================
// FLOORS
// =============================================================================

/// Number of stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Floors {
    /// 平屋 - single-story.
    #[serde(rename = "平屋")]
    SingleStory,
    /// 2階建て - two-story.
    #[serde(rename = "2階建て")]
    TwoStory,
    /// 3階建て - three-story.
    #[serde(rename = "3階建て")]
    ThreeStory,
}

impl Floors {
    pub const ALL: [Floors; 3] = [Self::SingleStory, Self::TwoStory, Self::ThreeStory];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleStory => "平屋",
            Self::TwoStory => "2階建て",
            Self::ThreeStory => "3階建て",
        }
    }

    /// Accept common alternate spellings (`平屋建て`, `1階建て`, `2階`, `二階建て`).
    pub fn parse_loose(s: &str) -> Option<Self> {
        let normalized: String = to_half_width(s)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let normalized = normalized
            .replace('一', "1")
            .replace('二', "2")
            .replace('三', "3");
        match normalized.as_str() {
            "平屋" | "平屋建" | "平屋建て" | "1階" | "1階建" | "1階建て" => {
                Some(Self::SingleStory)
            }
            "2階" | "2階建" | "2階建て" => Some(Self::TwoStory),
            "3階" | "3階建" | "3階建て" => Some(Self::ThreeStory),
            _ => None,
        }
    }
}

impl std::fmt::Display for Floors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Floors {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|floors| floors.as_str() == s)
            .ok_or_else(|| format!("Invalid floors: {}", s))
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Road-facing direction of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Direction {
    #[serde(rename = "東")]
    East,
    #[serde(rename = "西")]
    West,
    #[serde(rename = "南")]
    South,
    #[serde(rename = "北")]
    North,
    #[serde(rename = "北東")]
    NorthEast,
    #[serde(rename = "北西")]
    NorthWest,
    #[serde(rename = "南東")]
    SouthEast,
    #[serde(rename = "南西")]
    SouthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Self::East,
        Self::West,
        Self::South,
        Self::North,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::East => "東",
            Self::West => "西",
            Self::South => "南",
            Self::North => "北",
            Self::NorthEast => "北東",
            Self::NorthWest => "北西",
            Self::SouthEast => "南東",
            Self::SouthWest => "南西",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Self::East => "east",
            Self::West => "west",
            Self::South => "south",
            Self::North => "north",
            Self::NorthEast => "northeast",
            Self::NorthWest => "northwest",
            Self::SouthEast => "southeast",
            Self::SouthWest => "southwest",
        }
    }

    /// Accept `南道路`, `南向き`, `南側` and English names (`south`, `north-east`).
    pub fn parse_loose(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let stripped = ["道路", "向き", "側"]
            .iter()
            .fold(trimmed, |acc, suffix| acc.strip_suffix(*suffix).unwrap_or(acc))
            .trim();
        if let Ok(direction) = stripped.parse() {
            return Some(direction);
        }
        let english: String = stripped
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|d| d.english() == english)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str() == s)
            .ok_or_else(|| format!("Invalid direction: {}", s))
    }
}

// =============================================================================
// SENTINEL-AWARE CHECKS
// =============================================================================

/// True for a canonical layout token or the unknown sentinel.
pub fn is_valid_layout(s: &str) -> bool {
    s == UNKNOWN || s.parse::<Layout>().is_ok()
}

/// True for a canonical floors token or the unknown sentinel.
pub fn is_valid_floors(s: &str) -> bool {
    s == UNKNOWN || s.parse::<Floors>().is_ok()
}

/// True for a canonical direction token or the unknown sentinel.
pub fn is_valid_direction(s: &str) -> bool {
    s == UNKNOWN || s.parse::<Direction>().is_ok()
}

// =============================================================================
// UNITS
// =============================================================================

/// Convert tsubo to square meters.
pub fn tsubo_to_square_meters(tsubo: f64) -> f64 {
    tsubo * SQUARE_METERS_PER_TSUBO
}

/// Convert square meters to tsubo, rounded to two decimals.
pub fn square_meters_to_tsubo(square_meters: f64) -> f64 {
    (square_meters / SQUARE_METERS_PER_TSUBO * 100.0).round() / 100.0
}

/// Map full-width ASCII variants (U+FF01..U+FF5E) and the ideographic space
/// onto their half-width counterparts.
fn to_half_width(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => {
                char::from_u32(c as u32 - 0xFF01 + 0x21).unwrap_or(c)
            }
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_round_trips_through_display() {
        for layout in Layout::ALL {
            assert_eq!(layout.to_string().parse::<Layout>().unwrap(), layout);
        }
    }

    #[test]
    fn test_layout_from_str_is_exact() {
        assert!("3ldk".parse::<Layout>().is_err());
        assert!("1LDK".parse::<Layout>().is_err());
        assert!(" 3LDK".parse::<Layout>().is_err());
    }

    #[test]
    fn test_layout_parse_loose() {
        assert_eq!(Layout::parse_loose("3ldk"), Some(Layout::ThreeLdk));
        assert_eq!(Layout::parse_loose("４ＬＤＫ"), Some(Layout::FourLdk));
        assert_eq!(Layout::parse_loose(" 5 LDK "), Some(Layout::FiveLdk));
        assert_eq!(Layout::parse_loose("1LDK"), None);
    }

    #[test]
    fn test_floors_tokens() {
        assert_eq!("平屋".parse::<Floors>().unwrap(), Floors::SingleStory);
        assert_eq!("2階建て".parse::<Floors>().unwrap(), Floors::TwoStory);
        assert_eq!("3階建て".parse::<Floors>().unwrap(), Floors::ThreeStory);
        assert!("飛行船".parse::<Floors>().is_err());
    }

    #[test]
    fn test_floors_parse_loose() {
        assert_eq!(Floors::parse_loose("平屋建て"), Some(Floors::SingleStory));
        assert_eq!(Floors::parse_loose("２階"), Some(Floors::TwoStory));
        assert_eq!(Floors::parse_loose("二階建て"), Some(Floors::TwoStory));
        assert_eq!(Floors::parse_loose("3階建"), Some(Floors::ThreeStory));
        assert_eq!(Floors::parse_loose("4階建て"), None);
    }

    #[test]
    fn test_direction_tokens() {
        for direction in Direction::ALL {
            assert_eq!(
                direction.as_str().parse::<Direction>().unwrap(),
                direction
            );
        }
        assert!("東南".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_parse_loose() {
        assert_eq!(Direction::parse_loose("南道路"), Some(Direction::South));
        assert_eq!(Direction::parse_loose("北東向き"), Some(Direction::NorthEast));
        assert_eq!(Direction::parse_loose("西側"), Some(Direction::West));
        assert_eq!(Direction::parse_loose("South-West"), Some(Direction::SouthWest));
        assert_eq!(Direction::parse_loose("上"), None);
    }

    #[test]
    fn test_sentinel_is_valid_everywhere() {
        assert!(is_valid_layout("-"));
        assert!(is_valid_floors("-"));
        assert!(is_valid_direction("-"));
        assert!(!is_valid_layout("7LDK"));
        assert!(!is_valid_floors(""));
        assert!(!is_valid_direction("中央"));
    }

    #[test]
    fn test_serde_uses_canonical_tokens() {
        let json = serde_json::to_string(&Floors::TwoStory).unwrap();
        assert_eq!(json, "\"2階建て\"");
        let layout: Layout = serde_json::from_str("\"6LDK\"").unwrap();
        assert_eq!(layout, Layout::SixLdk);
    }

    #[test]
    fn test_unit_conversion() {
        assert!((tsubo_to_square_meters(10.0) - 33.0579).abs() < 1e-9);
        assert_eq!(square_meters_to_tsubo(99.17), 30.0);
        assert_eq!(square_meters_to_tsubo(0.0), 0.0);
    }
}
