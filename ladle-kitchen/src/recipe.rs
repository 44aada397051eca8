//! Recipes, ingredient lines and their validation
//!
//! Ingredient lines store a unit *name*, exactly as persisted by the
//! application. Validation resolves that name against the unit table and
//! reports every problem it finds so the entry form can block submission
//! and show them all at once.

use ladle_units::{get_unit, Unit};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::KitchenError;

/// One ingredient of a recipe: what, how much, in which unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        IngredientLine {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub servings: u32,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
}

impl Recipe {
    pub fn new(title: impl Into<String>, servings: u32) -> Self {
        Recipe {
            title: title.into(),
            servings,
            ingredients: Vec::new(),
        }
    }

    /// Builder: add an ingredient line
    pub fn with_ingredient(mut self, name: &str, amount: f64, unit: &str) -> Self {
        self.ingredients.push(IngredientLine::new(name, amount, unit));
        self
    }
}

fn validate_amount(line: &IngredientLine) -> Result<(), KitchenError> {
    if !line.amount.is_finite() || line.amount < 0.0 {
        return Err(KitchenError::InvalidAmount {
            ingredient: line.name.clone(),
            amount: line.amount,
        });
    }
    Ok(())
}

/// Validate one ingredient line and resolve its unit
///
/// The name must not be blank and amounts must be finite and non-negative.
/// The unit must be registered exactly as written; no default is ever
/// substituted.
pub fn validate_line(line: &IngredientLine) -> Result<&'static Unit, KitchenError> {
    if line.name.trim().is_empty() {
        return Err(KitchenError::EmptyName);
    }
    validate_amount(line)?;
    get_unit(&line.unit).ok_or_else(|| KitchenError::UnknownUnit {
        ingredient: Some(line.name.clone()),
        unit: line.unit.clone(),
        suggestions: crate::suggest_units(&line.unit),
    })
}

/// Validate a whole recipe, collecting every error
pub fn validate_recipe(recipe: &Recipe) -> Result<(), Vec<KitchenError>> {
    let mut errors = Vec::new();

    if recipe.servings == 0 {
        errors.push(KitchenError::InvalidServings(recipe.servings));
    }

    for line in &recipe.ingredients {
        if let Err(e) = validate_line(line) {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        debug!(recipe = %recipe.title, errors = errors.len(), "recipe failed validation");
        Err(errors)
    }
}
