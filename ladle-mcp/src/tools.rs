//! Tool registry and the unit/recipe tools
//!
//! Each tool is a `Tool` trait object registered by name. Argument problems
//! are protocol errors; domain problems (unknown unit, bad servings) are
//! returned as tool results with `isError: true` so the client can show
//! them to the user.

use std::collections::HashMap;
use std::sync::Arc;

use ladle_kitchen::{convert_recipe, scale_recipe, validate_recipe, KitchenError, Recipe};
use ladle_units::{
    convert, convert_amount_to_system, format_amount, from_base, get_unit, units,
    MeasurementSystem, UnitError, UnitKind,
};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::config::Config;

/// Metadata advertised by `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

/// Successful tool output: a human-readable line plus structured data
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub data: JsonValue,
}

/// Structured error for the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&KitchenError> for ToolError {
    fn from(err: &KitchenError) -> Self {
        ToolError {
            code: err.code(),
            message: err.to_string(),
            suggestion: err.suggestion(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolFailure {
    /// Missing or ill-typed arguments
    #[error("{0}")]
    InvalidArgs(String),

    #[error(transparent)]
    Kitchen(#[from] KitchenError),
}

impl From<UnitError> for ToolFailure {
    fn from(err: UnitError) -> Self {
        ToolFailure::Kitchen(err.into())
    }
}

/// A callable tool
pub trait Tool: Send + Sync {
    fn meta(&self) -> ToolMeta;
    fn call(&self, args: &JsonValue, config: &Config) -> Result<ToolOutput, ToolFailure>;
}

/// Registry of tools by name, in registration order
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn with_tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        let name = tool.meta().name;
        self.by_name.insert(name, self.tools.len());
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.by_name.get(name).map(|&i| self.tools[i].as_ref())
    }

    pub fn list(&self) -> Vec<ToolMeta> {
        self.tools.iter().map(|t| t.meta()).collect()
    }

    /// Tool names similar to the given name (for error suggestions)
    pub fn find_similar(&self, name: &str) -> Vec<&'static str> {
        let query = name.to_lowercase();
        self.tools.iter()
            .map(|t| t.meta().name)
            .filter(|candidate| {
                candidate.starts_with(&query)
                    || (!query.is_empty() && candidate.contains(&query))
                    || query.contains(candidate)
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with every unit and recipe tool
pub fn standard_registry() -> ToolRegistry {
    ToolRegistry::default()
        // Unit table (2 tools)
        .with_tool(GetUnit)
        .with_tool(ListUnits)

        // Conversion (4 tools)
        .with_tool(ToBase)
        .with_tool(FromBase)
        .with_tool(Convert)
        .with_tool(ConvertToSystem)

        // Recipes (3 tools)
        .with_tool(ScaleRecipe)
        .with_tool(ConvertRecipe)
        .with_tool(ValidateRecipe)
}

// ============ argument helpers ============

fn arg_f64(args: &JsonValue, name: &str) -> Result<f64, ToolFailure> {
    match args.get(name) {
        Some(v) => v.as_f64()
            .ok_or_else(|| ToolFailure::InvalidArgs(format!("argument '{}': expected number, got {}", name, v))),
        None => Err(ToolFailure::InvalidArgs(format!("missing argument '{}'", name))),
    }
}

fn arg_str<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, ToolFailure> {
    match args.get(name) {
        Some(v) => v.as_str()
            .ok_or_else(|| ToolFailure::InvalidArgs(format!("argument '{}': expected string, got {}", name, v))),
        None => Err(ToolFailure::InvalidArgs(format!("missing argument '{}'", name))),
    }
}

fn arg_optional_str<'a>(args: &'a JsonValue, name: &str) -> Result<Option<&'a str>, ToolFailure> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(_) => arg_str(args, name).map(Some),
    }
}

fn arg_servings(args: &JsonValue, name: &str) -> Result<u32, ToolFailure> {
    args.get(name)
        .ok_or_else(|| ToolFailure::InvalidArgs(format!("missing argument '{}'", name)))?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ToolFailure::InvalidArgs(format!("argument '{}': expected a whole number of servings", name)))
}

fn arg_recipe(args: &JsonValue) -> Result<Recipe, ToolFailure> {
    let raw = args.get("recipe")
        .ok_or_else(|| ToolFailure::InvalidArgs("missing argument 'recipe'".to_string()))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| ToolFailure::InvalidArgs(format!("argument 'recipe': {}", e)))
}

fn arg_system(args: &JsonValue, config: &Config) -> Result<MeasurementSystem, ToolFailure> {
    match arg_optional_str(args, "system")? {
        Some(s) => s.parse().map_err(|e| ToolFailure::InvalidArgs(format!("argument 'system': {}", e))),
        None => Ok(config.default_system),
    }
}

fn arg_kind(args: &JsonValue) -> Result<Option<UnitKind>, ToolFailure> {
    arg_optional_str(args, "kind")?
        .map(|s| s.parse().map_err(|e| ToolFailure::InvalidArgs(format!("argument 'kind': {}", e))))
        .transpose()
}

fn to_json<T: Serialize>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

// ============ get_unit ============

pub struct GetUnit;

impl Tool for GetUnit {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "get_unit",
            description: "Look up a unit by exact, case-sensitive name (e.g. \"tbsp\", \"L\")",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "unit": {"type": "string", "description": "Unit name"}
                },
                "required": ["unit"]
            }),
        }
    }

    fn call(&self, args: &JsonValue, _config: &Config) -> Result<ToolOutput, ToolFailure> {
        let name = arg_str(args, "unit")?;
        let unit = get_unit(name).ok_or_else(|| UnitError::UnknownUnit(name.to_string()))?;
        Ok(ToolOutput {
            text: format!("{}: {} {} (1 {} = {} {})",
                unit.name, unit.system, unit.kind,
                unit.name, format_amount(unit.factor_to_base), unit.base),
            data: to_json(unit),
        })
    }
}

// ============ list_units ============

pub struct ListUnits;

impl Tool for ListUnits {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "list_units",
            description: "List registered units in table order, optionally filtered by system and kind",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "system": {"type": "string", "enum": ["metric", "imperial", "neutral"]},
                    "kind": {"type": "string", "enum": ["volume", "mass", "count"]}
                }
            }),
        }
    }

    fn call(&self, args: &JsonValue, _config: &Config) -> Result<ToolOutput, ToolFailure> {
        let system: Option<MeasurementSystem> = arg_optional_str(args, "system")?
            .map(|s| s.parse().map_err(|e| ToolFailure::InvalidArgs(format!("argument 'system': {}", e))))
            .transpose()?;
        let kind = arg_kind(args)?;

        let selected: Vec<_> = units().iter()
            .filter(|u| system.map_or(true, |s| u.system == s))
            .filter(|u| kind.map_or(true, |k| u.kind == k))
            .collect();

        let names: Vec<&str> = selected.iter().map(|u| u.name).collect();
        Ok(ToolOutput {
            text: names.join(", "),
            data: json!({ "units": to_json(&selected) }),
        })
    }
}

// ============ to_base ============

pub struct ToBase;

impl Tool for ToBase {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "to_base",
            description: "Convert an amount to the base unit of its kind (g, ml or piece)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "amount": {"type": "number"},
                    "unit": {"type": "string"}
                },
                "required": ["amount", "unit"]
            }),
        }
    }

    fn call(&self, args: &JsonValue, _config: &Config) -> Result<ToolOutput, ToolFailure> {
        let amount = arg_f64(args, "amount")?;
        let name = arg_str(args, "unit")?;
        let unit = get_unit(name).ok_or_else(|| UnitError::UnknownUnit(name.to_string()))?;
        let base_amount = unit.to_base(amount);
        Ok(ToolOutput {
            text: format!("{} {}", format_amount(base_amount), unit.base),
            data: json!({ "amount": base_amount, "unit": unit.base, "already_base": unit.is_base() }),
        })
    }
}

// ============ from_base ============

pub struct FromBase;

impl Tool for FromBase {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "from_base",
            description: "Convert an amount in the base unit (g, ml or piece) to the given unit",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "amount": {"type": "number", "description": "Amount in the base unit"},
                    "unit": {"type": "string"}
                },
                "required": ["amount", "unit"]
            }),
        }
    }

    fn call(&self, args: &JsonValue, _config: &Config) -> Result<ToolOutput, ToolFailure> {
        let base_amount = arg_f64(args, "amount")?;
        let name = arg_str(args, "unit")?;
        let amount = from_base(base_amount, name)?;
        Ok(ToolOutput {
            text: format!("{} {}", format_amount(amount), name),
            data: json!({ "amount": amount, "unit": name }),
        })
    }
}

// ============ convert ============

pub struct Convert;

impl Tool for Convert {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "convert",
            description: "Convert an amount between two units of the same kind",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "amount": {"type": "number"},
                    "from": {"type": "string", "description": "Source unit (e.g. \"cup\")"},
                    "to": {"type": "string", "description": "Target unit (e.g. \"ml\")"}
                },
                "required": ["amount", "from", "to"]
            }),
        }
    }

    fn call(&self, args: &JsonValue, _config: &Config) -> Result<ToolOutput, ToolFailure> {
        let amount = arg_f64(args, "amount")?;
        let from = arg_str(args, "from")?;
        let to = arg_str(args, "to")?;
        let result = convert(amount, from, to)?;
        Ok(ToolOutput {
            text: format!("{} {} = {} {}", format_amount(amount), from, format_amount(result), to),
            data: json!({ "amount": result, "unit": to }),
        })
    }
}

// ============ convert_to_system ============

pub struct ConvertToSystem;

impl Tool for ConvertToSystem {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "convert_to_system",
            description: "Re-express an amount in the most readable unit of a measurement system. \
                          Count units (piece, pinch, clove, ...) are returned unchanged.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "amount": {"type": "number"},
                    "unit": {"type": "string"},
                    "system": {
                        "type": "string",
                        "enum": ["metric", "imperial", "neutral"],
                        "description": "Target system (defaults to the server's configured system)"
                    }
                },
                "required": ["amount", "unit"]
            }),
        }
    }

    fn call(&self, args: &JsonValue, config: &Config) -> Result<ToolOutput, ToolFailure> {
        let amount = arg_f64(args, "amount")?;
        let name = arg_str(args, "unit")?;
        let system = arg_system(args, config)?;
        let q = convert_amount_to_system(amount, name, system)?;
        Ok(ToolOutput {
            text: q.to_string(),
            data: to_json(&q),
        })
    }
}

// ============ scale_recipe ============

pub struct ScaleRecipe;

impl Tool for ScaleRecipe {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "scale_recipe",
            description: "Scale every ingredient of a recipe to a new number of servings",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "recipe": {"$ref": "#/$defs/recipe"},
                    "servings": {"type": "integer", "minimum": 1}
                },
                "required": ["recipe", "servings"],
                "$defs": recipe_schema()
            }),
        }
    }

    fn call(&self, args: &JsonValue, _config: &Config) -> Result<ToolOutput, ToolFailure> {
        let recipe = arg_recipe(args)?;
        let servings = arg_servings(args, "servings")?;
        let scaled = scale_recipe(&recipe, servings)?;
        Ok(ToolOutput {
            text: describe_recipe(&scaled),
            data: to_json(&scaled),
        })
    }
}

// ============ convert_recipe ============

pub struct ConvertRecipe;

impl Tool for ConvertRecipe {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "convert_recipe",
            description: "Re-express every ingredient of a recipe in one measurement system",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "recipe": {"$ref": "#/$defs/recipe"},
                    "system": {"type": "string", "enum": ["metric", "imperial"]}
                },
                "required": ["recipe"],
                "$defs": recipe_schema()
            }),
        }
    }

    fn call(&self, args: &JsonValue, config: &Config) -> Result<ToolOutput, ToolFailure> {
        let recipe = arg_recipe(args)?;
        let system = arg_system(args, config)?;
        let converted = convert_recipe(&recipe, system)?;
        Ok(ToolOutput {
            text: describe_recipe(&converted),
            data: to_json(&converted),
        })
    }
}

// ============ validate_recipe ============

pub struct ValidateRecipe;

impl Tool for ValidateRecipe {
    fn meta(&self) -> ToolMeta {
        ToolMeta {
            name: "validate_recipe",
            description: "Check a recipe before saving: every ingredient needs a known unit and a non-negative amount",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "recipe": {"$ref": "#/$defs/recipe"}
                },
                "required": ["recipe"],
                "$defs": recipe_schema()
            }),
        }
    }

    fn call(&self, args: &JsonValue, _config: &Config) -> Result<ToolOutput, ToolFailure> {
        let recipe = arg_recipe(args)?;
        // Validation problems are the result here, not a failure
        let errors: Vec<ToolError> = match validate_recipe(&recipe) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(ToolError::from).collect(),
        };

        let text = if errors.is_empty() {
            format!("'{}' is valid", recipe.title)
        } else {
            errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("\n")
        };

        Ok(ToolOutput {
            text,
            data: json!({ "valid": errors.is_empty(), "errors": to_json(&errors) }),
        })
    }
}

fn recipe_schema() -> JsonValue {
    json!({
        "recipe": {
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "servings": {"type": "integer"},
                "ingredients": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "amount": {"type": "number"},
                            "unit": {"type": "string"}
                        },
                        "required": ["name", "amount", "unit"]
                    }
                }
            },
            "required": ["title", "servings"]
        }
    })
}

fn describe_recipe(recipe: &Recipe) -> String {
    let mut out = format!("{} ({} servings)", recipe.title, recipe.servings);
    for line in &recipe.ingredients {
        out.push_str(&format!("\n- {} {} {}", format_amount(line.amount), line.unit, line.name));
    }
    out
}

/// Hint for an unknown tool name
pub fn unknown_tool_hint(registry: &ToolRegistry, name: &str) -> Option<String> {
    let similar = registry.find_similar(name);
    if similar.is_empty() {
        None
    } else {
        Some(format!("Similar: {}. Use tools/list for the full list.", similar.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn call(name: &str, args: JsonValue) -> Result<ToolOutput, ToolFailure> {
        let registry = standard_registry();
        registry.get(name).unwrap().call(&args, &Config::default())
    }

    fn domain_code(result: Result<ToolOutput, ToolFailure>) -> &'static str {
        match result {
            Err(ToolFailure::Kitchen(e)) => e.code(),
            other => panic!("expected domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_registry_lists_all_tools() {
        let registry = standard_registry();
        let names: Vec<_> = registry.list().iter().map(|m| m.name).collect();
        assert_eq!(names, vec![
            "get_unit", "list_units", "to_base", "from_base", "convert",
            "convert_to_system", "scale_recipe", "convert_recipe", "validate_recipe",
        ]);
        assert!(registry.get("nope").is_none());
        assert!(ToolRegistry::default().list().is_empty());
    }

    #[test]
    fn test_find_similar() {
        let registry = standard_registry();
        let similar = registry.find_similar("convert_");
        assert!(similar.contains(&"convert_to_system"));
        assert!(similar.contains(&"convert_recipe"));
        assert!(unknown_tool_hint(&registry, "qqq").is_none());
    }

    #[test]
    fn test_get_unit() {
        let out = call("get_unit", json!({"unit": "cup"})).unwrap();
        assert_eq!(out.text, "cup: imperial volume (1 cup = 240 ml)");
        assert_eq!(out.data["factor_to_base"], 240.0);
        assert_eq!(domain_code(call("get_unit", json!({"unit": "Cup"}))), "UNKNOWN_UNIT");
    }

    #[test]
    fn test_list_units_filters() {
        let out = call("list_units", json!({"system": "metric", "kind": "volume"})).unwrap();
        assert_eq!(out.text, "ml, L");
        assert_eq!(out.data["units"].as_array().unwrap().len(), 2);

        let all = call("list_units", json!({})).unwrap();
        assert_eq!(all.data["units"].as_array().unwrap().len(), units().len());

        assert!(matches!(
            call("list_units", json!({"kind": "length"})),
            Err(ToolFailure::InvalidArgs(_))
        ));
    }

    #[test]
    fn test_base_tools() {
        let out = call("to_base", json!({"amount": 2, "unit": "cup"})).unwrap();
        assert_eq!(out.text, "480 ml");
        assert_eq!(out.data["unit"], "ml");
        assert_eq!(out.data["already_base"], false);
        let out = call("to_base", json!({"amount": 3, "unit": "g"})).unwrap();
        assert_eq!(out.data["already_base"], true);
        let out = call("from_base", json!({"amount": 480, "unit": "cup"})).unwrap();
        assert_relative_eq!(out.data["amount"].as_f64().unwrap(), 2.0);
        assert_eq!(domain_code(call("to_base", json!({"amount": 1, "unit": "parsec"}))), "UNKNOWN_UNIT");
    }

    #[test]
    fn test_convert_tool() {
        let out = call("convert", json!({"amount": 1, "from": "tbsp", "to": "tsp"})).unwrap();
        assert_eq!(out.text, "1 tbsp = 3 tsp");
        assert_eq!(domain_code(call("convert", json!({"amount": 1, "from": "g", "to": "ml"}))), "INCOMPATIBLE_UNITS");
    }

    #[test]
    fn test_convert_to_system_tool() {
        let out = call("convert_to_system", json!({"amount": 1, "unit": "cup", "system": "metric"})).unwrap();
        assert_eq!(out.text, "240 ml");
        assert_eq!(out.data["unit"]["name"], "ml");

        // defaults to the configured system
        let out = call("convert_to_system", json!({"amount": 2, "unit": "gallon"})).unwrap();
        assert_eq!(out.text, "7.68 L");

        let imperial = Config { default_system: MeasurementSystem::Imperial, ..Config::default() };
        let out = standard_registry().get("convert_to_system").unwrap()
            .call(&json!({"amount": 500, "unit": "g"}), &imperial)
            .unwrap();
        assert_eq!(out.data["unit"]["name"], "lb");
    }

    #[test]
    fn test_argument_errors() {
        match call("convert", json!({"amount": "lots", "from": "g", "to": "kg"})) {
            Err(ToolFailure::InvalidArgs(msg)) => assert!(msg.contains("'amount'")),
            other => panic!("expected invalid args, got {:?}", other),
        }
        match call("to_base", json!({"amount": 1})) {
            Err(ToolFailure::InvalidArgs(msg)) => assert_eq!(msg, "missing argument 'unit'"),
            other => panic!("expected invalid args, got {:?}", other),
        }
        assert!(matches!(
            call("convert_to_system", json!({"amount": 1, "unit": "g", "system": "martian"})),
            Err(ToolFailure::InvalidArgs(_))
        ));
    }

    fn recipe_json() -> JsonValue {
        json!({
            "title": "Pancakes",
            "servings": 2,
            "ingredients": [
                {"name": "flour", "amount": 1, "unit": "cup"},
                {"name": "eggs", "amount": 1, "unit": "piece"}
            ]
        })
    }

    #[test]
    fn test_scale_recipe_tool() {
        let out = call("scale_recipe", json!({"recipe": recipe_json(), "servings": 6})).unwrap();
        assert_eq!(out.data["servings"], 6);
        assert_eq!(out.data["ingredients"][0]["amount"], 3.0);
        assert_eq!(out.text, "Pancakes (6 servings)\n- 3 cup flour\n- 3 piece eggs");

        assert_eq!(
            domain_code(call("scale_recipe", json!({"recipe": recipe_json(), "servings": 0}))),
            "INVALID_SERVINGS"
        );
        assert!(matches!(
            call("scale_recipe", json!({"recipe": recipe_json(), "servings": -1})),
            Err(ToolFailure::InvalidArgs(_))
        ));
    }

    #[test]
    fn test_convert_recipe_tool() {
        let out = call("convert_recipe", json!({"recipe": recipe_json(), "system": "metric"})).unwrap();
        assert_eq!(out.data["ingredients"][0]["unit"], "ml");
        assert_eq!(out.data["ingredients"][1]["unit"], "piece");

        assert!(matches!(
            call("convert_recipe", json!({"recipe": {"title": "x"}})),
            Err(ToolFailure::InvalidArgs(_))
        ));
    }

    #[test]
    fn test_validate_recipe_tool() {
        let out = call("validate_recipe", json!({"recipe": recipe_json()})).unwrap();
        assert_eq!(out.data["valid"], true);
        assert_eq!(out.text, "'Pancakes' is valid");

        let bad = json!({
            "title": "Bad",
            "servings": 1,
            "ingredients": [{"name": "milk", "amount": 1, "unit": "litre"}]
        });
        let out = call("validate_recipe", json!({"recipe": bad})).unwrap();
        assert_eq!(out.data["valid"], false);
        assert_eq!(out.data["errors"][0]["code"], "UNKNOWN_UNIT");
        assert_eq!(out.data["errors"][0]["suggestion"], "Did you mean: L?");
    }

    #[test]
    fn test_tool_error_from_kitchen_error() {
        let err = ToolError::from(&KitchenError::InvalidServings(0));
        assert_eq!(err.code, "INVALID_SERVINGS");
        assert_eq!(err.message, "servings must be positive, got 0");
        assert_eq!(err.suggestion.as_deref(), Some("Use at least 1 serving"));
    }
}
