//! Amounts paired with their unit

use std::fmt;
use serde::Serialize;
use crate::{convert, convert_amount_to_system, get_unit, MeasurementSystem, Unit, UnitError};

/// An amount expressed in a registered unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quantity {
    pub amount: f64,
    pub unit: &'static Unit,
}

impl Quantity {
    pub fn new(amount: f64, unit: &'static Unit) -> Self {
        Quantity { amount, unit }
    }

    /// Build from an amount and a unit name
    pub fn parse(amount: f64, unit_name: &str) -> Result<Self, UnitError> {
        get_unit(unit_name)
            .map(|unit| Quantity::new(amount, unit))
            .ok_or_else(|| UnitError::UnknownUnit(unit_name.to_string()))
    }

    /// Amount in the base unit of this quantity's kind
    pub fn base_amount(&self) -> f64 {
        self.unit.to_base(self.amount)
    }

    /// Re-express in another unit of the same kind
    pub fn to_unit(&self, unit_name: &str) -> Result<Quantity, UnitError> {
        let amount = convert(self.amount, self.unit.name, unit_name)?;
        Quantity::parse(amount, unit_name)
    }

    /// Re-express in the most readable unit of `target`
    pub fn to_system(&self, target: MeasurementSystem) -> Result<Quantity, UnitError> {
        convert_amount_to_system(self.amount, self.unit.name, target)
    }
}

/// Format an amount with at most two decimals and no trailing zeros
pub fn format_amount(amount: f64) -> String {
    let s = format!("{:.2}", amount);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_amount(self.amount), self.unit)
    }
}
