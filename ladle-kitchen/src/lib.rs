//! Ladle Kitchen - Recipe Operations
//!
//! Recipe-level operations on top of ladle-units:
//! - Ingredient line and recipe validation (unknown units block submission)
//! - "Did you mean" unit suggestions
//! - Recipe scaling by servings
//! - Whole-recipe conversion to metric or imperial
//!
//! For single conversions (cup ↔ ml, g ↔ lb), use ladle-units directly.

mod error;
mod helpers;
mod recipe;
mod scaling;

pub use error::{KitchenError, codes};
pub use helpers::{normalize_unit_input, suggest_units};
pub use recipe::{IngredientLine, Recipe, validate_line, validate_recipe};
pub use scaling::{scale_amount, scale_recipe, convert_line, convert_recipe};
