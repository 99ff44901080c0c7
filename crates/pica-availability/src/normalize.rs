//! Structural normalization of availability payloads.
//!
//! The availability endpoint returns either an array of program objects or
//! an object keyed by channel id; both shapes funnel through
//! [`normalize_program`]. Entries that resolve no channel identifier are
//! dropped — callers never see them and no error is raised.

use std::collections::BTreeMap;

use pica_core::{AvailabilityProgram, CheckType, Month};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::freight::parse_freight_metrics;
use crate::probe::{decimal_from_value, probe_bool, probe_string, units_from_value};

/// Channel-id aliases, highest priority first.
const CHANNEL_ID_ALIASES: &[&str] = &["channel_id", "program_id", "id"];
/// Program display-name aliases, highest priority first.
const PROGRAM_NAME_ALIASES: &[&str] = &["program_name", "name", "title"];

/// Normalizes a full availability payload into program records.
///
/// Accepts an array of program objects or a mapping keyed by channel id;
/// for the mapping shape, each entry's key serves as the fallback channel
/// id when the entry itself carries none. Any other payload shape yields
/// an empty list.
#[must_use]
pub fn normalize_payload(raw: &Value) -> Vec<AvailabilityProgram> {
    match raw {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| normalize_program(entry, None))
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, entry)| normalize_program(entry, Some(key)))
            .collect(),
        _ => {
            tracing::warn!("availability payload is neither array nor object; ignoring");
            Vec::new()
        }
    }
}

/// Normalizes a single raw program entry.
///
/// Returns `None` when no channel identifier can be resolved from the
/// entry or the fallback — the entry is simply not a program.
#[must_use]
pub fn normalize_program(
    raw: &Value,
    fallback_channel_id: Option<&str>,
) -> Option<AvailabilityProgram> {
    let channel_id = probe_string(raw, "channel_id", CHANNEL_ID_ALIASES).or_else(|| {
        fallback_channel_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    });
    let Some(channel_id) = channel_id else {
        tracing::debug!("dropping availability entry with no resolvable channel id");
        return None;
    };

    let program_name =
        probe_string(raw, "program_name", PROGRAM_NAME_ALIASES).unwrap_or_else(|| channel_id.clone());

    let check_type = probe_string(
        raw,
        "availability_check_type",
        &["availability_check_type", "check_type"],
    )
    .map_or(CheckType::Manual, |s| CheckType::parse(&s));

    let duration_disclaimer = probe_bool(
        raw,
        "duration_disclaimer",
        &["duration_disclaimer", "extended_fulfillment"],
    )
    .unwrap_or(false);

    let metrics = raw.get("metrics").and_then(Value::as_object);

    let media_rate = metrics
        .and_then(|m| m.get("media_rate"))
        .and_then(decimal_from_value)
        .or_else(|| raw.get("media_rate").and_then(decimal_from_value))
        .unwrap_or(Decimal::ZERO);

    let freight_ranges = metrics.map(parse_freight_metrics).unwrap_or_default();

    let (monthly_availability, availability_reasons) = normalize_months(raw);

    Some(AvailabilityProgram {
        channel_id,
        program_name,
        check_type,
        media_rate,
        freight_ranges,
        monthly_availability,
        availability_reasons,
        duration_disclaimer,
    })
}

/// Derives the per-month unit counts and zero-month reasons from the
/// entry's `availability` list.
///
/// Unit derivation per entry, in order: a numeric `available` field, a
/// numeric-string `available`, then `max_slot` (which also covers the
/// `available: true` case, where the slot cap is the usable number).
/// Anything else counts as zero. Only zero months record a reason.
fn normalize_months(raw: &Value) -> (BTreeMap<Month, u64>, BTreeMap<Month, String>) {
    let mut months = BTreeMap::new();
    let mut reasons = BTreeMap::new();

    let Some(entries) = raw.get("availability").and_then(Value::as_array) else {
        return (months, reasons);
    };

    for entry in entries {
        let Some(month) = probe_string(entry, "month", &["month", "month_name"])
            .as_deref()
            .and_then(Month::parse)
        else {
            tracing::debug!("dropping availability month entry with no parseable month");
            continue;
        };

        let units = entry
            .get("available")
            .and_then(units_from_value)
            .or_else(|| entry.get("max_slot").and_then(units_from_value))
            .unwrap_or(0);

        if units == 0 {
            if let Some(reason) = extract_reason(entry) {
                reasons.insert(month, reason);
            }
        } else {
            reasons.remove(&month);
        }
        months.insert(month, units);
    }

    (months, reasons)
}

/// Pulls the zero-availability reason: a plain string `reason`, or the
/// `message` field of a structured `reason` object.
fn extract_reason(entry: &Value) -> Option<String> {
    let reason = entry.get("reason")?;
    let text = match reason {
        Value::String(s) => s.trim(),
        Value::Object(obj) => obj.get("message")?.as_str()?.trim(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}
