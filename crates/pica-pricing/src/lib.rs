//! Pricing and booking-quantity logic for availability reports.
//!
//! Everything in this crate is pure computation: callers feed it normalized
//! [`pica_core::AvailabilityProgram`] records, user-entered booking
//! quantities, and a print price matrix, and get a cost breakdown back.
//! Nothing is cached — results are recomputed on every call, and partially
//! entered sheets (months left unset, fields mid-edit) are valid input.

pub mod booking;
pub mod calc;
pub mod matrix;

pub use booking::{
    format_quantity, validate_quantity, BookingEntry, BookingError, BookingSheet,
    BOOKING_INCREMENT,
};
pub use calc::{price_campaign, CampaignPricing, ProgramCost};
pub use matrix::{PrintPriceMatrix, PrintPriceTier};
