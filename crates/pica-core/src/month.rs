//! Calendar months as used for monthly availability and booking maps.
//!
//! Availability payloads key months by lowercase full name (`"january"`),
//! but upstream sources have been observed sending title-case names and
//! three-letter abbreviations, so [`Month::parse`] accepts all three.

use serde::{Deserialize, Serialize};

/// A calendar month. Ordering follows the calendar, so a
/// `BTreeMap<Month, _>` iterates January through December.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All twelve months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// The canonical lowercase name used in wire payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
            Month::October => "october",
            Month::November => "november",
            Month::December => "december",
        }
    }

    /// Parses a month name in any case, accepting full names and
    /// three-letter abbreviations (`"Sept"` is also tolerated since at
    /// least one upstream feed uses the four-letter form).
    ///
    /// Returns `None` for anything unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Month> {
        let lower = s.trim().to_lowercase();
        if lower.len() < 3 {
            return None;
        }
        Month::ALL
            .into_iter()
            .find(|m| m.as_str().starts_with(&lower) || lower.starts_with(m.as_str()))
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
