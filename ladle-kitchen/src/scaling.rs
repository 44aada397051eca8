//! Recipe scaling and system conversion
//!
//! Scale a recipe to a different number of servings, or re-express every
//! ingredient in one measurement system.

use ladle_units::{convert_amount_to_system, MeasurementSystem};
use tracing::debug;

use crate::{IngredientLine, KitchenError, Recipe};

/// Scale an ingredient amount for different serving sizes
///
/// `scale_amount(2.0, 4, 8)` is `4.0`.
pub fn scale_amount(amount: f64, from_servings: u32, to_servings: u32) -> Result<f64, KitchenError> {
    if from_servings == 0 {
        return Err(KitchenError::InvalidServings(from_servings));
    }
    if to_servings == 0 {
        return Err(KitchenError::InvalidServings(to_servings));
    }
    // scaled = amount * (to / from)
    Ok(amount * (to_servings as f64 / from_servings as f64))
}

/// Scale every ingredient of a recipe to `servings`; units are unchanged
pub fn scale_recipe(recipe: &Recipe, servings: u32) -> Result<Recipe, KitchenError> {
    if recipe.servings == 0 {
        return Err(KitchenError::InvalidServings(recipe.servings));
    }
    if servings == 0 {
        return Err(KitchenError::InvalidServings(servings));
    }

    let ingredients = recipe.ingredients.iter()
        .map(|line| -> Result<IngredientLine, KitchenError> {
            Ok(IngredientLine {
                amount: scale_amount(line.amount, recipe.servings, servings)?,
                ..line.clone()
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(recipe = %recipe.title, from = recipe.servings, to = servings, "scaled recipe");

    Ok(Recipe {
        title: recipe.title.clone(),
        servings,
        ingredients,
    })
}

/// Re-express one line in the nicest unit of `target`
pub fn convert_line(line: &IngredientLine, target: MeasurementSystem) -> Result<IngredientLine, KitchenError> {
    let q = convert_amount_to_system(line.amount, &line.unit, target)
        .map_err(|e| KitchenError::from_unit_error(e, Some(&line.name)))?;

    Ok(IngredientLine {
        name: line.name.clone(),
        amount: q.amount,
        unit: q.unit.name.to_string(),
    })
}

/// Re-express every ingredient in `target`; the first unit error stops it
pub fn convert_recipe(recipe: &Recipe, target: MeasurementSystem) -> Result<Recipe, KitchenError> {
    let ingredients = recipe.ingredients.iter()
        .map(|line| convert_line(line, target))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Recipe {
        title: recipe.title.clone(),
        servings: recipe.servings,
        ingredients,
    })
}
