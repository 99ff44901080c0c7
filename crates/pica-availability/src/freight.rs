//! Freight-band parsing from availability metric keys.
//!
//! The availability service flattens freight pricing into its `metrics`
//! map using keys of the form `freight_<min>[_<max>|_plus]`:
//!
//! - `freight_25k_49k` — closed band from 25,000 to 49,000
//! - `freight_50k_plus` — open-ended band from 50,000 up
//! - `freight_100000` — band matching **only** exactly 100,000 units
//!
//! Quantity tokens may carry a `k` (×1,000) or `m` (×1,000,000) suffix.
//! Keys or values that do not parse are dropped without surfacing an error.
//! This format is inferred from live payloads, so both the single-token
//! exact-match shape and the `_plus` open-ended shape are pinned by tests.

use pica_core::FreightRange;
use serde_json::{Map, Value};

use crate::probe::decimal_from_value;

/// Extracts all freight bands from a `metrics` map, sorted ascending by
/// `min`. Non-freight keys are ignored.
#[must_use]
pub fn parse_freight_metrics(metrics: &Map<String, Value>) -> Vec<FreightRange> {
    let mut ranges: Vec<FreightRange> = metrics
        .iter()
        .filter_map(|(key, value)| {
            let (min, max) = parse_freight_key(key)?;
            let Some(value) = decimal_from_value(value) else {
                tracing::debug!(key = %key, "dropping freight metric with non-numeric value");
                return None;
            };
            Some(FreightRange { min, max, value })
        })
        .collect();
    ranges.sort_by_key(|r| r.min);
    ranges
}

/// Parses a `freight_*` metric key into `(min, max)` bounds.
///
/// Returns `None` for non-freight keys and for freight keys whose quantity
/// tokens do not parse; the caller drops those silently.
pub(crate) fn parse_freight_key(key: &str) -> Option<(u64, Option<u64>)> {
    let spec = key.strip_prefix("freight_")?;
    let tokens: Vec<&str> = spec.split('_').collect();
    match tokens.as_slice() {
        // A lone quantity token is an exact-match band, not "and above".
        [min] => {
            let min = parse_quantity_token(min)?;
            Some((min, Some(min)))
        }
        [min, "plus"] => {
            let min = parse_quantity_token(min)?;
            Some((min, None))
        }
        [min, max] => {
            let min = parse_quantity_token(min)?;
            let max = parse_quantity_token(max)?;
            Some((min, Some(max)))
        }
        _ => {
            tracing::debug!(key, "dropping unparseable freight key");
            None
        }
    }
}

/// Parses a quantity token such as `"25000"`, `"25k"`, or `"1m"`.
fn parse_quantity_token(token: &str) -> Option<u64> {
    let (digits, multiplier) = match token.as_bytes().last()? {
        b'k' | b'K' => (&token[..token.len() - 1], 1_000.0),
        b'm' | b'M' => (&token[..token.len() - 1], 1_000_000.0),
        _ => (token, 1.0),
    };
    let value = digits.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn metrics(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn quantity_token_plain_number() {
        assert_eq!(parse_quantity_token("25000"), Some(25_000));
    }

    #[test]
    fn quantity_token_k_suffix() {
        assert_eq!(parse_quantity_token("25k"), Some(25_000));
        assert_eq!(parse_quantity_token("49K"), Some(49_000));
    }

    #[test]
    fn quantity_token_m_suffix() {
        assert_eq!(parse_quantity_token("1m"), Some(1_000_000));
        assert_eq!(parse_quantity_token("2.5m"), Some(2_500_000));
    }

    #[test]
    fn quantity_token_garbage_is_none() {
        assert_eq!(parse_quantity_token("lots"), None);
        assert_eq!(parse_quantity_token(""), None);
        assert_eq!(parse_quantity_token("-25k"), None);
    }

    #[test]
    fn key_with_two_tokens_is_closed_band() {
        assert_eq!(
            parse_freight_key("freight_25k_49999"),
            Some((25_000, Some(49_999)))
        );
    }

    #[test]
    fn key_with_plus_suffix_is_open_ended() {
        assert_eq!(parse_freight_key("freight_50k_plus"), Some((50_000, None)));
    }

    #[test]
    fn key_with_single_token_matches_exact_quantity_only() {
        assert_eq!(
            parse_freight_key("freight_100000"),
            Some((100_000, Some(100_000)))
        );
    }

    #[test]
    fn non_freight_key_is_ignored() {
        assert_eq!(parse_freight_key("media_rate"), None);
        assert_eq!(parse_freight_key("freightliner"), None);
    }

    #[test]
    fn unparseable_tokens_are_dropped() {
        assert_eq!(parse_freight_key("freight_lots"), None);
        assert_eq!(parse_freight_key("freight_25k_some"), None);
        assert_eq!(parse_freight_key("freight_1_2_3"), None);
    }

    #[test]
    fn metrics_map_parses_and_sorts_ascending() {
        let m = metrics(&[
            ("freight_50k_plus", json!(90)),
            ("media_rate", json!(12.5)),
            ("freight_0_24999", json!("35.50")),
            ("freight_25k_49999", json!(60)),
        ]);
        let ranges = parse_freight_metrics(&m);
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].min, 0);
        assert_eq!(ranges[0].value, dec!(35.50));
        assert_eq!(ranges[1].min, 25_000);
        assert_eq!(ranges[2].min, 50_000);
        assert_eq!(ranges[2].max, None);
    }

    #[test]
    fn non_numeric_metric_value_is_dropped() {
        let m = metrics(&[("freight_25k_49k", json!("call us"))]);
        assert!(parse_freight_metrics(&m).is_empty());
    }
}
