//! Command handlers for the CLI.
//!
//! These are called from `main` after config and logging are established.
//! Per-field booking failures are reported and priced as zero rather than
//! aborting the report, so one bad entry does not hide the rest of the
//! numbers.

use pica_api::{ApiClient, AvailabilityRequest};
use pica_core::{AppConfig, CheckType, Month};
use pica_pricing::{format_quantity, price_campaign, BookingSheet, PrintPriceMatrix};
use pica_wizard::resolve_step;
use uuid::Uuid;

/// Resolve and print the wizard step for a campaign.
pub(crate) async fn run_stage(
    config: &AppConfig,
    campaign_id: &Uuid,
    requested: Option<u8>,
) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;
    let campaign = client.get_campaign(campaign_id).await?;
    let step = resolve_step(&campaign, requested);
    println!("campaign {campaign_id} resumes at step {step}");
    Ok(())
}

/// List advertising categories.
pub(crate) async fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;
    let categories = client.get_categories().await?;
    if categories.is_empty() {
        println!("no categories available");
        return Ok(());
    }
    for category in categories {
        println!("{}\t{}", category.id, category.name);
    }
    Ok(())
}

/// List insert print formats.
pub(crate) async fn run_print_types(config: &AppConfig) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;
    let types = client.get_insert_print_types().await?;
    if types.is_empty() {
        println!("no insert print types available");
        return Ok(());
    }
    for print_type in types {
        println!("{}\t{}", print_type.id, print_type.name);
    }
    Ok(())
}

pub(crate) struct ReportArgs {
    pub campaign_id: Option<Uuid>,
    pub category_id: String,
    pub channels: Vec<String>,
    pub format: String,
    pub bookings: Vec<String>,
    pub json: bool,
}

/// Fetch availability and the print price matrix, apply the requested
/// bookings, and print the priced report.
pub(crate) async fn run_report(config: &AppConfig, args: ReportArgs) -> anyhow::Result<()> {
    let client = ApiClient::from_config(config)?;

    let request = AvailabilityRequest {
        channel_ids: args.channels.clone(),
        category_id: args.category_id.clone(),
        campaign_id: args.campaign_id,
    };
    let (programs, thresholds) = tokio::try_join!(
        client.fetch_availability(&request),
        client.get_print_price_matrix(&args.format),
    )?;

    if programs.is_empty() {
        println!("no programs returned for the requested channels");
        return Ok(());
    }
    let matrix = PrintPriceMatrix::from_thresholds(&thresholds);
    if matrix.is_empty() {
        tracing::warn!(format = %args.format, "empty print price matrix; print cost will be zero");
    }

    let mut sheet = BookingSheet::new();
    for spec in &args.bookings {
        let (channel_id, month, quantity) = match parse_booking_spec(spec) {
            Ok(parsed) => parsed,
            Err(reason) => {
                eprintln!("skipping booking '{spec}': {reason}");
                continue;
            }
        };
        let Some(program) = programs.iter().find(|p| p.channel_id == channel_id) else {
            eprintln!("skipping booking '{spec}': channel '{channel_id}' not in the report");
            continue;
        };
        let ceiling = program.availability_for(month);
        if ceiling == 0 {
            let reason = program
                .availability_reasons
                .get(&month)
                .map_or("no availability", String::as_str);
            eprintln!("skipping booking '{spec}': {month} is closed ({reason})");
        }
        sheet.set_entry(&channel_id, month, &quantity, ceiling);
    }

    for (channel_id, month, error) in sheet.errors() {
        eprintln!("invalid booking for {channel_id} in {month}: {error}");
    }

    let pricing = price_campaign(&programs, &sheet, &matrix);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pricing)?);
        return Ok(());
    }

    for row in &pricing.programs {
        println!(
            "{} ({}): qty {}  media {}  print {}  freight {}  total {}",
            row.program_name,
            row.channel_id,
            format_quantity(row.quantity),
            row.media_cost,
            row.print_cost,
            row.freight_cost,
            row.total,
        );
        let program = programs
            .iter()
            .find(|p| p.channel_id == row.channel_id)
            .expect("pricing rows come from the program list");
        if program.check_type == CheckType::Manual {
            println!("  note: availability subject to manual confirmation");
        }
        if program.duration_disclaimer {
            println!("  note: extended fulfillment time applies");
        }
    }
    println!(
        "campaign total: qty {}  amount {}",
        format_quantity(pricing.total_quantity),
        pricing.total_amount,
    );
    Ok(())
}

/// Parses a booking argument of the form `<channel>:<month>=<quantity>`.
/// The quantity is returned raw; the booking validator owns its parsing.
fn parse_booking_spec(spec: &str) -> Result<(String, Month, String), String> {
    let (channel, rest) = spec
        .split_once(':')
        .ok_or_else(|| "expected <channel>:<month>=<quantity>".to_owned())?;
    let (month, quantity) = rest
        .split_once('=')
        .ok_or_else(|| "expected <channel>:<month>=<quantity>".to_owned())?;
    let channel = channel.trim();
    if channel.is_empty() {
        return Err("channel id is empty".to_owned());
    }
    let month = Month::parse(month).ok_or_else(|| format!("unknown month '{month}'"))?;
    Ok((channel.to_owned(), month, quantity.trim().to_owned()))
}
