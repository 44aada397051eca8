//! Structured kitchen errors
//!
//! Every error carries a machine-readable code and, where one exists, a hint
//! the ingredient form can show next to the offending field.

use ladle_units::{UnitError, UnitKind};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
    pub const INVALID_AMOUNT: &str = "INVALID_AMOUNT";
    pub const INVALID_SERVINGS: &str = "INVALID_SERVINGS";
    pub const EMPTY_NAME: &str = "EMPTY_NAME";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KitchenError {
    #[error("unknown unit '{unit}'{}", for_ingredient(.ingredient))]
    UnknownUnit {
        ingredient: Option<String>,
        unit: String,
        suggestions: Vec<&'static str>,
    },

    #[error("cannot convert {from} ({from_kind}) to {to} ({to_kind})")]
    IncompatibleUnits {
        from: String,
        to: String,
        from_kind: UnitKind,
        to_kind: UnitKind,
    },

    #[error("ingredient '{ingredient}': amount must be a finite non-negative number, got {amount}")]
    InvalidAmount { ingredient: String, amount: f64 },

    #[error("servings must be positive, got {0}")]
    InvalidServings(u32),

    #[error("ingredient has no name")]
    EmptyName,
}

fn for_ingredient(ingredient: &Option<String>) -> String {
    match ingredient {
        Some(name) => format!(" for ingredient '{}'", name),
        None => String::new(),
    }
}

impl KitchenError {
    pub fn code(&self) -> &'static str {
        match self {
            KitchenError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            KitchenError::IncompatibleUnits { .. } => codes::INCOMPATIBLE_UNITS,
            KitchenError::InvalidAmount { .. } => codes::INVALID_AMOUNT,
            KitchenError::InvalidServings(_) => codes::INVALID_SERVINGS,
            KitchenError::EmptyName => codes::EMPTY_NAME,
        }
    }

    /// Suggestion for fixing the error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            KitchenError::UnknownUnit { suggestions, .. } if !suggestions.is_empty() => {
                Some(format!("Did you mean: {}?", suggestions.join(", ")))
            }
            KitchenError::UnknownUnit { .. } => {
                Some("Use list_units to see the available units".to_string())
            }
            KitchenError::IncompatibleUnits { from_kind, to_kind, .. } => Some(format!(
                "A {} unit can only be converted to another {} unit, not to {}",
                from_kind, from_kind, to_kind
            )),
            KitchenError::InvalidAmount { .. } => Some("Enter an amount of 0 or more".to_string()),
            KitchenError::InvalidServings(_) => Some("Use at least 1 serving".to_string()),
            KitchenError::EmptyName => Some("Give the ingredient a name".to_string()),
        }
    }

    /// Attach the ingredient a unit error belongs to
    pub fn from_unit_error(err: UnitError, ingredient: Option<&str>) -> Self {
        match err {
            UnitError::UnknownUnit(unit) => KitchenError::UnknownUnit {
                ingredient: ingredient.map(str::to_string),
                suggestions: crate::suggest_units(&unit),
                unit,
            },
            UnitError::IncompatibleKinds { from, to, from_kind, to_kind } => {
                KitchenError::IncompatibleUnits { from, to, from_kind, to_kind }
            }
        }
    }
}

impl From<UnitError> for KitchenError {
    fn from(err: UnitError) -> Self {
        KitchenError::from_unit_error(err, None)
    }
}
