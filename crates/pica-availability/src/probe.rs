//! Field-alias probing over `serde_json::Value` objects.
//!
//! Aliases are tried in a fixed priority order; the first defined, non-null,
//! non-empty value wins. Which alias matched is reported at debug level so a
//! payload mismatch can be diagnosed from logs instead of guessed at.

use rust_decimal::Decimal;
use serde_json::Value;

/// Probes `aliases` in order for a string-like value, taking the first
/// defined, non-null, non-empty one.
///
/// String values are trimmed; numeric values are accepted and rendered to
/// their decimal form, since id fields arrive as numbers from at least one
/// upstream source. Null, empty, and non-coercible values fall through to
/// the next alias.
#[must_use]
pub fn probe_string(obj: &Value, field: &str, aliases: &[&str]) -> Option<String> {
    let map = obj.as_object()?;
    for &alias in aliases {
        let resolved = match map.get(alias) {
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    continue;
                }
                trimmed.to_owned()
            }
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        tracing::debug!(field, alias, "resolved field via alias");
        return Some(resolved);
    }
    None
}

/// Probes `aliases` in order for a boolean value. String `"true"`/`"false"`
/// is accepted alongside JSON booleans; anything else falls through.
#[must_use]
pub fn probe_bool(obj: &Value, field: &str, aliases: &[&str]) -> Option<bool> {
    let map = obj.as_object()?;
    for &alias in aliases {
        let resolved = match map.get(alias) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim() {
                "true" => true,
                "false" => false,
                _ => continue,
            },
            _ => continue,
        };
        tracing::debug!(field, alias, "resolved field via alias");
        return Some(resolved);
    }
    None
}

/// Converts a JSON value to a [`Decimal`]: numbers directly, strings by
/// parsing. Anything else is `None`.
#[must_use]
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(|f| Decimal::try_from(f).ok())
            }
        }
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Converts a JSON value to a unit count: non-negative numbers (fractions
/// truncated) or numeric strings. Anything else is `None`.
#[must_use]
pub fn units_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', "");
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }
        _ => None,
    }
}
