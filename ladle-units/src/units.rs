//! Unit definitions - the fixed kitchen unit table
//!
//! Declaration order matters: system conversion scans candidates in this
//! order and the first candidate wins initial ties. Stored ingredient records
//! reference these names, so renaming or removing an entry is a breaking
//! change.

use std::collections::HashMap;
use std::sync::LazyLock;
use crate::{MeasurementSystem, Unit, UnitKind};

use crate::MeasurementSystem::{Imperial, Metric};
use crate::UnitKind::{Mass, Volume};

/// Global unit registry, in declaration order
pub static UNITS: &[Unit] = &[
    // === MASS (base: g) ===
    Unit::new("g", Metric, Mass, "g", 1.0, 1.0),
    Unit::new("kg", Metric, Mass, "g", 1000.0, 0.001),
    Unit::new("oz", Imperial, Mass, "g", 28.349523125, 1.0 / 28.349523125),
    Unit::new("lb", Imperial, Mass, "g", 453.59237, 1.0 / 453.59237),

    // === VOLUME (base: ml) ===
    Unit::new("ml", Metric, Volume, "ml", 1.0, 1.0),
    Unit::new("L", Metric, Volume, "ml", 1000.0, 0.001),
    Unit::new("tsp", Imperial, Volume, "ml", 5.0, 0.2),
    Unit::new("tbsp", Imperial, Volume, "ml", 15.0, 1.0 / 15.0),
    Unit::new("floz", Imperial, Volume, "ml", 30.0, 1.0 / 30.0),
    Unit::new("cup", Imperial, Volume, "ml", 240.0, 1.0 / 240.0),
    Unit::new("pint", Imperial, Volume, "ml", 480.0, 1.0 / 480.0),
    Unit::new("quart", Imperial, Volume, "ml", 960.0, 1.0 / 960.0),
    Unit::new("gallon", Imperial, Volume, "ml", 3840.0, 1.0 / 3840.0),

    // === COUNT (base: piece) ===
    Unit::count("piece"),
    Unit::count("pinch"),
    Unit::count("clove"),
    Unit::count("slice"),
    Unit::count("bunch"),
    Unit::count("can"),
];

/// Name -> position in UNITS
static INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    UNITS.iter()
        .enumerate()
        .map(|(i, unit)| (unit.name, i))
        .collect()
});

/// Get a unit by exact (case-sensitive) name
pub fn get_unit(name: &str) -> Option<&'static Unit> {
    INDEX.get(name).map(|&i| &UNITS[i])
}

/// All units, in declaration order
pub fn units() -> &'static [Unit] {
    UNITS
}

/// Units of one system and kind, in declaration order
pub fn units_where(
    system: MeasurementSystem,
    kind: UnitKind,
) -> impl Iterator<Item = &'static Unit> {
    UNITS.iter().filter(move |u| u.system == system && u.kind == kind)
}

/// Get all unit names, in declaration order
pub fn unit_names() -> Vec<&'static str> {
    UNITS.iter().map(|u| u.name).collect()
}
