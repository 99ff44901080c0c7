//! Normalized program availability records.
//!
//! An [`AvailabilityProgram`] is the canonical per-program shape produced by
//! the availability normalizer from the remote service's loose payload. It
//! is constructed fresh on every availability fetch and never mutated
//! afterwards; pricing reads it, nothing writes it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::month::Month;

/// Whether a program's open slots are confirmed automatically or require
/// human confirmation before a booking is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    Instant,
    Manual,
}

impl CheckType {
    /// Parses the wire value. Anything other than `"instant"` (any case)
    /// is treated as manual — an unrecognized program should not be
    /// presented as instantly bookable.
    #[must_use]
    pub fn parse(s: &str) -> CheckType {
        if s.trim().eq_ignore_ascii_case("instant") {
            CheckType::Instant
        } else {
            CheckType::Manual
        }
    }
}

/// A shipping-cost band keyed by booked quantity.
///
/// `max: None` means the band is open-ended. A band with `min == max`
/// matches only that exact quantity; the upstream metric format encodes
/// such bands as a single-token key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreightRange {
    pub min: u64,
    pub max: Option<u64>,
    pub value: Decimal,
}

impl FreightRange {
    /// Whether `quantity` falls inside this band.
    #[must_use]
    pub fn contains(&self, quantity: u64) -> bool {
        quantity >= self.min && self.max.is_none_or(|max| quantity <= max)
    }
}

/// One program's availability and pricing facts, normalized from the
/// availability service payload.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityProgram {
    /// Unique key for the retailer/media-outlet slot.
    pub channel_id: String,
    pub program_name: String,
    pub check_type: CheckType,
    /// Media cost per 1000 booked units.
    pub media_rate: Decimal,
    /// Sorted ascending by `min`.
    pub freight_ranges: Vec<FreightRange>,
    /// Units available per month. Months absent from the payload are
    /// absent here; callers treat absence as zero.
    pub monthly_availability: BTreeMap<Month, u64>,
    /// Human-readable reasons, recorded only for months with zero
    /// availability.
    pub availability_reasons: BTreeMap<Month, String>,
    /// Whether to surface an extended-fulfillment-time warning.
    pub duration_disclaimer: bool,
}

impl AvailabilityProgram {
    /// Units available in `month`, zero when the month is absent.
    #[must_use]
    pub fn availability_for(&self, month: Month) -> u64 {
        self.monthly_availability.get(&month).copied().unwrap_or(0)
    }
}
