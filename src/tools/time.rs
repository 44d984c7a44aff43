//! Current local time for a free-text city name.
//!
//! City names are matched against the tail of IANA zone identifiers, so
//! "São Paulo" resolves to `America/Sao_Paulo` and "paris" to `Europe/Paris`.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::{Tz, TZ_VARIANTS};
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::report::TimeResult;
use crate::tool::{Tool, ToolRegistry};

pub const EMPTY_CITY: &str = "City name cannot be empty.";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Clone)]
pub struct LocationTimeResolver {
    clock: Arc<dyn Clock>,
}

impl Default for LocationTimeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationTimeResolver {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn current_time(&self, city: Option<&str>) -> TimeResult {
        let city = match city {
            Some(city) if !city.trim().is_empty() => city,
            _ => return TimeResult::error(EMPTY_CITY),
        };

        match find_time_zone(city) {
            Some(tz) => {
                let local = self.clock.now().with_timezone(&tz);
                debug!(city, zone = tz.name(), "resolved time zone");
                TimeResult::success(format!(
                    "The current time in {city} is {}.",
                    local.format("%H:%M")
                ))
            }
            None => TimeResult::error(format!(
                "Sorry, I don't have timezone information for {city}."
            )),
        }
    }
}

fn strip_pattern() -> &'static Regex {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    // `_` is connector punctuation but also the separator we emit.
    STRIP.get_or_init(|| Regex::new(r"[\p{M}\p{P}&&[^_]]+").expect("valid strip pattern"))
}

fn whitespace_pattern() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Fold a place name into the lowercase, underscore-separated form used by
/// zone identifiers. Applying it twice gives the same result as once.
pub fn normalize_location_name(name: &str) -> String {
    let decomposed: String = name.nfd().collect();
    let folded = decomposed.trim().to_lowercase();
    let stripped = strip_pattern().replace_all(&folded, "");
    whitespace_pattern().replace_all(&stripped, "_").into_owned()
}

/// First zone whose identifier ends with `/<normalized name>`, case-insensitively.
pub fn find_time_zone(city: &str) -> Option<Tz> {
    let suffix = format!("/{}", normalize_location_name(city));
    TZ_VARIANTS
        .iter()
        .copied()
        .find(|tz| tz.name().to_lowercase().ends_with(&suffix))
}

/// Create a time toolkit exposing `current_time`.
pub fn time_toolkit(resolver: LocationTimeResolver) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(CurrentTimeTool { resolver });
    registry
}

struct CurrentTimeTool {
    resolver: LocationTimeResolver,
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current local time in a city. Expects {\"city\": string}."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "city": {"type": "string", "description": "City name, e.g. \"Paris\""}
            },
            "required": ["city"]
        }))
    }

    async fn call(&self, input: Value) -> Result<Value> {
        let city = input.get("city").and_then(Value::as_str);
        Ok(serde_json::to_value(self.resolver.current_time(city))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Status;
    use chrono::TimeZone;

    fn resolver_at(h: u32, m: u32) -> LocationTimeResolver {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap();
        LocationTimeResolver::with_clock(Arc::new(FixedClock(instant)))
    }

    #[test]
    fn rejects_blank_city() {
        let resolver = resolver_at(12, 0);
        for city in [None, Some(""), Some("   "), Some("\t\n")] {
            let result = resolver.current_time(city);
            assert_eq!(result.status, Status::Error);
            assert_eq!(result.report, EMPTY_CITY);
        }
    }

    #[test]
    fn reports_local_time_for_paris() {
        let result = resolver_at(12, 30).current_time(Some("Paris"));
        assert_eq!(result.status, Status::Success);
        assert_eq!(result.report, "The current time in Paris is 13:30.");
    }

    #[test]
    fn zero_pads_hours_and_minutes() {
        let result = resolver_at(0, 5).current_time(Some("London"));
        assert_eq!(result.report, "The current time in London is 00:05.");
    }

    #[test]
    fn echoes_original_text_for_accented_names() {
        let result = resolver_at(12, 30).current_time(Some("São Paulo"));
        assert_eq!(result.status, Status::Success);
        assert_eq!(result.report, "The current time in São Paulo is 09:30.");
    }

    #[test]
    fn unknown_city_is_an_error() {
        let result = resolver_at(12, 0).current_time(Some("Atlantis"));
        assert_eq!(result.status, Status::Error);
        assert_eq!(
            result.report,
            "Sorry, I don't have timezone information for Atlantis."
        );
    }

    #[test]
    fn system_clock_report_has_hh_mm() {
        let result = LocationTimeResolver::new().current_time(Some("Tokyo"));
        let re = Regex::new(r"^The current time in Tokyo is \d{2}:\d{2}\.$").unwrap();
        assert!(re.is_match(&result.report), "{}", result.report);
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_location_name("  New York "), "new_york");
        assert_eq!(normalize_location_name("São Paulo"), "sao_paulo");
        assert_eq!(normalize_location_name("St. John's"), "st_johns");
        assert_eq!(normalize_location_name("Zürich"), "zurich");
        assert_eq!(normalize_location_name("Los_Angeles"), "los_angeles");
    }

    #[test]
    fn normalization_is_idempotent() {
        for name in ["New York", "São Paulo", "St. John's", ". paris", "Ho  Chi   Minh", "x ."] {
            let once = normalize_location_name(name);
            assert_eq!(normalize_location_name(&once), once, "input {name:?}");
        }
    }

    #[test]
    fn matches_zone_suffix() {
        assert_eq!(find_time_zone("paris").map(|tz| tz.name()), Some("Europe/Paris"));
        assert_eq!(
            find_time_zone("los angeles").map(|tz| tz.name()),
            Some("America/Los_Angeles")
        );
        assert!(find_time_zone("...").is_none());
    }

    #[tokio::test]
    async fn tool_passes_missing_city_through() {
        let registry = time_toolkit(resolver_at(12, 0));
        let out = registry.call("current_time", json!({})).await.unwrap();
        assert_eq!(out, json!({"status": "error", "report": EMPTY_CITY}));
    }
}
