//! Measurement systems and physical kinds
//!
//! Every unit belongs to exactly one system (metric, imperial, neutral) and
//! measures exactly one kind of quantity (volume, mass, count). Conversion
//! only ever happens within a kind; the system decides which units are
//! offered to a given audience.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

/// Grouping of units by convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
    /// Count-style units with no cross-system equivalent
    Neutral,
}

impl MeasurementSystem {
    pub const ALL: [MeasurementSystem; 3] = [
        MeasurementSystem::Metric,
        MeasurementSystem::Imperial,
        MeasurementSystem::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementSystem::Metric => "metric",
            MeasurementSystem::Imperial => "imperial",
            MeasurementSystem::Neutral => "neutral",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementSystem {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(MeasurementSystem::Metric),
            "imperial" | "us" => Ok(MeasurementSystem::Imperial),
            "neutral" => Ok(MeasurementSystem::Neutral),
            _ => Err(ParseKindError::System(s.to_string())),
        }
    }
}

/// Physical quantity a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Volume,
    Mass,
    Count,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [UnitKind::Volume, UnitKind::Mass, UnitKind::Count];

    /// Name of the canonical unit every conversion of this kind passes through
    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitKind::Volume => "ml",
            UnitKind::Mass => "g",
            UnitKind::Count => "piece",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Volume => "volume",
            UnitKind::Mass => "mass",
            UnitKind::Count => "count",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "volume" => Ok(UnitKind::Volume),
            "mass" | "weight" => Ok(UnitKind::Mass),
            "count" => Ok(UnitKind::Count),
            _ => Err(ParseKindError::Kind(s.to_string())),
        }
    }
}

/// Failure to parse a system or kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseKindError {
    #[error("unknown measurement system: {0} (expected metric, imperial or neutral)")]
    System(String),

    #[error("unknown unit kind: {0} (expected volume, mass or count)")]
    Kind(String),
}
