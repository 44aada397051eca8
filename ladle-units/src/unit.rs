//! Unit representation with conversion factors

use std::fmt;
use serde::Serialize;
use thiserror::Error;
use crate::{MeasurementSystem, UnitKind};

/// A measurement unit with explicit factors to and from its kind's base unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    /// The unit symbol (e.g., "g", "tsp", "piece"), unique and case-sensitive
    pub name: &'static str,
    /// Convention the unit belongs to
    pub system: MeasurementSystem,
    /// Physical quantity measured
    pub kind: UnitKind,
    /// Base unit shared by every unit of this kind
    pub base: &'static str,
    /// amount_base = amount * factor_to_base
    pub factor_to_base: f64,
    /// amount = amount_base * factor_from_base (stored, not recomputed)
    pub factor_from_base: f64,
}

impl Unit {
    /// A unit measured in multiples of its kind's base unit
    pub const fn new(
        name: &'static str,
        system: MeasurementSystem,
        kind: UnitKind,
        base: &'static str,
        factor_to_base: f64,
        factor_from_base: f64,
    ) -> Self {
        Unit { name, system, kind, base, factor_to_base, factor_from_base }
    }

    /// A count-style unit: neutral, and always 1:1 with "piece"
    pub const fn count(name: &'static str) -> Self {
        Unit::new(name, MeasurementSystem::Neutral, UnitKind::Count, "piece", 1.0, 1.0)
    }

    /// Check if this is the base unit of its kind
    pub fn is_base(&self) -> bool {
        self.name == self.base
    }

    /// Check if two units measure the same kind (can be converted)
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.kind == other.kind
    }

    /// Convert an amount in this unit to the base unit
    pub fn to_base(&self, amount: f64) -> f64 {
        amount * self.factor_to_base
    }

    /// Convert an amount in the base unit to this unit
    pub fn from_base(&self, base_amount: f64) -> f64 {
        base_amount * self.factor_from_base
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Errors that can occur during unit conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// Unit name not present in the registry
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// Units measure different kinds and cannot be converted
    #[error("cannot convert {from} ({from_kind}) to {to} ({to_kind}): incompatible kinds")]
    IncompatibleKinds {
        from: String,
        to: String,
        from_kind: UnitKind,
        to_kind: UnitKind,
    },
}
