//! Booking-quantity validation and per-campaign booking state.
//!
//! Quantities are entered as free text, one field per program per month,
//! and validated on every keystroke against the then-current availability
//! ceiling. The raw text is kept alongside the parsed value so an invalid
//! in-progress entry redisplays exactly as typed.

use std::collections::{BTreeMap, HashMap};

use pica_core::Month;
use serde::Serialize;
use thiserror::Error;

/// Bookings must be placed in multiples of this many units.
pub const BOOKING_INCREMENT: u64 = 25_000;

/// A user-visible, per-field validation failure. The `Display` text is the
/// inline message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum BookingError {
    #[error("Must be a number")]
    NotANumber,

    #[error("Cannot be negative")]
    Negative,

    #[error("Must be in increments of 25,000")]
    NotAnIncrement,

    /// Carries the pre-formatted ceiling so the message matches the
    /// on-screen availability figure.
    #[error("Cannot exceed availability of {0}")]
    ExceedsAvailability(String),
}

/// Validates one quantity field against a month's availability ceiling.
///
/// Empty or whitespace-only input is valid and means "not booking this
/// month" (`Ok(None)`). Thousands-separator commas are stripped before
/// parsing.
///
/// # Errors
///
/// In priority order: [`BookingError::NotANumber`],
/// [`BookingError::Negative`], [`BookingError::ExceedsAvailability`],
/// [`BookingError::NotAnIncrement`]. The ceiling check runs before the
/// increment check: an over-availability entry reports the ceiling even
/// when it is also off-increment.
pub fn validate_quantity(raw: &str, ceiling: u64) -> Result<Option<u64>, BookingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let cleaned = trimmed.replace(',', "");
    let value: f64 = cleaned.parse().map_err(|_| BookingError::NotANumber)?;
    if !value.is_finite() {
        return Err(BookingError::NotANumber);
    }
    if value < 0.0 {
        return Err(BookingError::Negative);
    }

    let quantity = value as u64;
    if quantity > ceiling {
        return Err(BookingError::ExceedsAvailability(format_quantity(ceiling)));
    }
    // Fractional input can never be an increment multiple, so it falls out
    // of the same check as 30,000-style values.
    if value % (BOOKING_INCREMENT as f64) != 0.0 {
        return Err(BookingError::NotAnIncrement);
    }
    Ok(Some(quantity))
}

/// Formats a quantity with thousands separators: `1250000` → `"1,250,000"`.
#[must_use]
pub fn format_quantity(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One program/month booking field: the text as typed, the validated
/// quantity when the text is valid, and the inline error when it is not.
#[derive(Debug, Clone, Serialize)]
pub struct BookingEntry {
    pub raw: String,
    pub quantity: Option<u64>,
    pub error: Option<BookingError>,
}

/// All booking fields for a campaign, keyed by channel id then month.
///
/// Invalid and unset entries contribute zero to every total, so pricing
/// can run over a sheet the user is still filling in.
#[derive(Debug, Clone, Default)]
pub struct BookingSheet {
    entries: HashMap<String, BTreeMap<Month, BookingEntry>>,
}

impl BookingSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field edit, validating against `ceiling`.
    ///
    /// A zero ceiling means the field is disabled upstream: the entry is
    /// cleared rather than validated, matching the bound input's behavior.
    pub fn set_entry(&mut self, channel_id: &str, month: Month, raw: &str, ceiling: u64) {
        if ceiling == 0 {
            if let Some(months) = self.entries.get_mut(channel_id) {
                months.remove(&month);
            }
            return;
        }

        let entry = match validate_quantity(raw, ceiling) {
            Ok(quantity) => BookingEntry {
                raw: raw.to_owned(),
                quantity,
                error: None,
            },
            Err(error) => BookingEntry {
                raw: raw.to_owned(),
                quantity: None,
                error: Some(error),
            },
        };
        self.entries
            .entry(channel_id.to_owned())
            .or_default()
            .insert(month, entry);
    }

    #[must_use]
    pub fn entry(&self, channel_id: &str, month: Month) -> Option<&BookingEntry> {
        self.entries.get(channel_id)?.get(&month)
    }

    /// The validated quantity for one field, zero when unset or invalid.
    #[must_use]
    pub fn quantity(&self, channel_id: &str, month: Month) -> u64 {
        self.entry(channel_id, month)
            .and_then(|e| e.quantity)
            .unwrap_or(0)
    }

    /// Sum of validated quantities across all months for one program.
    #[must_use]
    pub fn program_total(&self, channel_id: &str) -> u64 {
        self.entries
            .get(channel_id)
            .map(|months| months.values().filter_map(|e| e.quantity).sum())
            .unwrap_or(0)
    }

    /// Every field currently carrying a validation error.
    pub fn errors(&self) -> impl Iterator<Item = (&str, Month, &BookingError)> + '_ {
        self.entries.iter().flat_map(|(channel, months)| {
            months.iter().filter_map(move |(month, entry)| {
                entry.error.as_ref().map(|e| (channel.as_str(), *month, e))
            })
        })
    }
}
