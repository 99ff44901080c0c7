//! Cost computation for the availability report.
//!
//! Media and freight cost depend only on a program's own booked quantity;
//! print cost is volume-discounted on the combined order across the whole
//! campaign and billed proportionally per program. All functions are pure
//! and total-quantity driven — a program with nothing booked costs nothing.

use pica_core::AvailabilityProgram;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::booking::BookingSheet;
use crate::matrix::PrintPriceMatrix;

/// Media cost: `media_rate` is per 1000 units.
#[must_use]
pub fn media_cost(program: &AvailabilityProgram, quantity: u64) -> Decimal {
    if quantity == 0 {
        return Decimal::ZERO;
    }
    program.media_rate / Decimal::from(1000) * Decimal::from(quantity)
}

/// Freight cost for a program's total booked quantity.
///
/// Takes the first ascending-`min` band containing the quantity. When no
/// band contains it (the quantity overshoots every closed band), the band
/// with the largest `min` at or below the quantity applies; when the
/// quantity is below every band, freight is zero.
#[must_use]
pub fn freight_cost(program: &AvailabilityProgram, quantity: u64) -> Decimal {
    if quantity == 0 {
        return Decimal::ZERO;
    }
    if let Some(range) = program.freight_ranges.iter().find(|r| r.contains(quantity)) {
        return range.value;
    }
    program
        .freight_ranges
        .iter()
        .filter(|r| r.min <= quantity)
        .max_by_key(|r| r.min)
        .map_or(Decimal::ZERO, |r| r.value)
}

/// Print cost billed to one program: the campaign-aggregate quantity picks
/// the unit price, the program's own quantity is what gets charged.
#[must_use]
pub fn print_cost(
    matrix: &PrintPriceMatrix,
    aggregate_quantity: u64,
    program_quantity: u64,
) -> Decimal {
    if program_quantity == 0 {
        return Decimal::ZERO;
    }
    matrix
        .unit_price_for(aggregate_quantity)
        .map_or(Decimal::ZERO, |price| price * Decimal::from(program_quantity))
}

/// Cost breakdown for one program in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramCost {
    pub channel_id: String,
    pub program_name: String,
    pub quantity: u64,
    pub media_cost: Decimal,
    pub print_cost: Decimal,
    pub freight_cost: Decimal,
    pub total: Decimal,
}

/// The full priced report: per-program breakdowns plus campaign totals.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignPricing {
    pub programs: Vec<ProgramCost>,
    pub total_quantity: u64,
    pub total_amount: Decimal,
}

/// Prices a whole campaign from the normalized programs, the user's booking
/// sheet, and the active print price matrix.
///
/// Tolerates a partially filled sheet: unset and invalid entries count as
/// zero. Programs appear in the output in the order given, including
/// zero-quantity ones (the report renders those rows at zero cost).
#[must_use]
pub fn price_campaign(
    programs: &[AvailabilityProgram],
    sheet: &BookingSheet,
    matrix: &PrintPriceMatrix,
) -> CampaignPricing {
    let aggregate_quantity: u64 = programs
        .iter()
        .map(|p| sheet.program_total(&p.channel_id))
        .sum();

    let mut rows = Vec::with_capacity(programs.len());
    let mut total_amount = Decimal::ZERO;

    for program in programs {
        let quantity = sheet.program_total(&program.channel_id);
        let media = media_cost(program, quantity);
        let print = print_cost(matrix, aggregate_quantity, quantity);
        let freight = freight_cost(program, quantity);
        let total = media + print + freight;
        total_amount += total;
        rows.push(ProgramCost {
            channel_id: program.channel_id.clone(),
            program_name: program.program_name.clone(),
            quantity,
            media_cost: media,
            print_cost: print,
            freight_cost: freight,
            total,
        });
    }

    CampaignPricing {
        programs: rows,
        total_quantity: aggregate_quantity,
        total_amount,
    }
}
