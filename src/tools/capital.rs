//! Capital city lookup over a small fixed table.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::report::CapitalResult;
use crate::tool::{Tool, ToolRegistry};

pub const EMPTY_COUNTRY: &str = "Country name cannot be empty.";

const COUNTRY_CAPITALS: &[(&str, &str)] = &[
    ("france", "Paris"),
    ("germany", "Berlin"),
    ("japan", "Tokyo"),
    ("united states", "Washington, D.C."),
    ("canada", "Ottawa"),
    ("india", "New Delhi"),
    ("brazil", "Brasília"),
    ("australia", "Canberra"),
    ("south africa", "Pretoria"),
    ("china", "Beijing"),
    ("mexico", "Mexico City"),
];

/// Case-insensitive exact match; surrounding whitespace is significant.
pub fn capital_of(country: &str) -> Option<&'static str> {
    let key = country.to_lowercase();
    COUNTRY_CAPITALS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, capital)| *capital)
}

pub fn capital_city(country: Option<&str>) -> CapitalResult {
    let country = match country {
        Some(country) if !country.trim().is_empty() => country,
        _ => return CapitalResult::error(EMPTY_COUNTRY),
    };

    match capital_of(country) {
        Some(capital) => {
            CapitalResult::success(format!("The capital city of {country} is {capital}."))
        }
        None => CapitalResult::error(format!(
            "Sorry, I don't have information about the capital city of {country}."
        )),
    }
}

/// Create a toolkit exposing `capital_city`.
pub fn capital_toolkit() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(CapitalCityTool);
    registry
}

struct CapitalCityTool;

#[async_trait]
impl Tool for CapitalCityTool {
    fn name(&self) -> &str {
        "capital_city"
    }

    fn description(&self) -> &str {
        "Look up the capital city of a country. Expects {\"country\": string}."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "country": {"type": "string", "description": "Country name, e.g. \"France\""}
            },
            "required": ["country"]
        }))
    }

    async fn call(&self, input: Value) -> Result<Value> {
        let country = input.get("country").and_then(Value::as_str);
        Ok(serde_json::to_value(capital_city(country))?)
    }
}
