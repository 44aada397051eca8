//! Common kitchen utilities

use ladle_units::units;

/// Common spellings people type for registered units
static SPELLINGS: &[(&str, &str)] = &[
    ("gram", "g"), ("grams", "g"), ("gr", "g"),
    ("kilogram", "kg"), ("kilograms", "kg"), ("kilo", "kg"), ("kilos", "kg"),
    ("ounce", "oz"), ("ounces", "oz"),
    ("pound", "lb"), ("pounds", "lb"), ("lbs", "lb"),
    ("milliliter", "ml"), ("milliliters", "ml"), ("millilitre", "ml"), ("millilitres", "ml"),
    ("liter", "L"), ("liters", "L"), ("litre", "L"), ("litres", "L"),
    ("teaspoon", "tsp"), ("teaspoons", "tsp"),
    ("tablespoon", "tbsp"), ("tablespoons", "tbsp"), ("tbs", "tbsp"),
    ("fluidounce", "floz"), ("fluidounces", "floz"),
    ("cups", "cup"),
    ("pints", "pint"), ("pt", "pint"),
    ("quarts", "quart"), ("qt", "quart"),
    ("gallons", "gallon"), ("gal", "gallon"),
    ("pieces", "piece"), ("pc", "piece"), ("pcs", "piece"),
    ("pinches", "pinch"),
    ("cloves", "clove"),
    ("slices", "slice"),
    ("bunches", "bunch"),
    ("cans", "can"),
];

/// Normalize free-form unit input (lowercase, no spaces or dots)
pub fn normalize_unit_input(input: &str) -> String {
    input.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect()
}

/// Registered unit names similar to `input`, best first (at most three)
///
/// Used to build "did you mean" hints; the result is never substituted for
/// what the user typed.
pub fn suggest_units(input: &str) -> Vec<&'static str> {
    let query = normalize_unit_input(input);
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<(&'static str, usize)> = units().iter()
        .filter_map(|unit| {
            let score = similarity_score(&query, unit.name);
            if score > 0 {
                Some((unit.name, score))
            } else {
                None
            }
        })
        .collect();

    // Sort by similarity score (higher = more similar); stable keeps table order on ties
    matches.sort_by(|a, b| b.1.cmp(&a.1));
    matches.into_iter().take(3).map(|(name, _)| name).collect()
}

/// Calculate similarity score between normalized input and a unit name
fn similarity_score(query: &str, unit_name: &str) -> usize {
    let candidate = unit_name.to_lowercase();

    // Same unit with different case ("Cup", "l")
    if candidate == query {
        return 200;
    }
    if SPELLINGS.iter().any(|&(spelling, name)| spelling == query && name == unit_name) {
        return 150;
    }

    if candidate.starts_with(query) {
        100
    } else if candidate.len() > 1 && candidate.contains(query) {
        50
    } else if candidate.len() > 1 && query.contains(candidate.as_str()) {
        30
    } else {
        0
    }
}
