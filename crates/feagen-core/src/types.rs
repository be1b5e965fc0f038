//! Small value types shared by every writer

use crate::error::{FeagenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 15924 code of the neutral bucket (Common, Inherited and Unknown fold here)
pub const NEUTRAL_SCRIPT: &str = "Zyyy";

/// Horizontal writing direction of a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "LTR")]
    LeftToRight,
    #[serde(rename = "RTL")]
    RightToLeft,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::LeftToRight => "LTR",
            Direction::RightToLeft => "RTL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strong bidirectional type of a codepoint, collapsed to two values
///
/// R and AL map to `R`. L, AN and EN map to `L`, so numerals behave
/// left-to-right even inside right-to-left scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BidiType {
    L,
    R,
}

impl fmt::Display for BidiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BidiType::L => f.write_str("L"),
            BidiType::R => f.write_str("R"),
        }
    }
}

/// Feature tags the writers know how to generate
///
/// The variant order is the splice order. `Gdef` stands for the `GDEF`
/// table block, which is merged rather than spliced like a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureTag {
    Kern,
    Dist,
    Mark,
    Mkmk,
    Gdef,
    Curs,
}

impl FeatureTag {
    pub const ALL: [FeatureTag; 6] = [
        FeatureTag::Kern,
        FeatureTag::Dist,
        FeatureTag::Mark,
        FeatureTag::Mkmk,
        FeatureTag::Gdef,
        FeatureTag::Curs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureTag::Kern => "kern",
            FeatureTag::Dist => "dist",
            FeatureTag::Mark => "mark",
            FeatureTag::Mkmk => "mkmk",
            FeatureTag::Gdef => "GDEF",
            FeatureTag::Curs => "curs",
        }
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureTag {
    type Err = FeagenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "kern" => Ok(FeatureTag::Kern),
            "dist" => Ok(FeatureTag::Dist),
            "mark" => Ok(FeatureTag::Mark),
            "mkmk" => Ok(FeatureTag::Mkmk),
            "GDEF" | "gdef" => Ok(FeatureTag::Gdef),
            "curs" => Ok(FeatureTag::Curs),
            other => Err(FeagenError::Config(format!("unknown feature tag '{other}'"))),
        }
    }
}

/// How generated features are merged with an existing document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Leave a tag alone when the document already has a block for it,
    /// unless that block carries an insertion marker
    #[default]
    Skip,
    /// Always add new blocks at the end, ignoring insertion markers
    Append,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Skip => "skip",
            Mode::Append => "append",
        }
    }
}

impl FromStr for Mode {
    type Err = FeagenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Mode::Skip),
            "append" => Ok(Mode::Append),
            _ => Err(FeagenError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round half up, the way OpenType compilers round coordinates
pub fn ot_round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
