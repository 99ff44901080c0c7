mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "pica-cli")]
#[command(about = "Print-insert campaign booking tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve which wizard step a campaign should resume at.
    Stage {
        #[arg(long)]
        campaign_id: Uuid,
        /// Step to prefer when the campaign record does not decide one.
        #[arg(long)]
        step: Option<u8>,
    },
    /// List the advertising categories.
    Categories,
    /// List the insert print formats.
    PrintTypes,
    /// Build a priced availability report for a set of channels.
    Report {
        #[arg(long)]
        campaign_id: Option<Uuid>,
        #[arg(long)]
        category_id: String,
        /// Comma-separated channel ids to check.
        #[arg(long, value_delimiter = ',', required = true)]
        channels: Vec<String>,
        /// Insert print format for the price matrix.
        #[arg(long)]
        format: String,
        /// Booking entries as <channel>:<month>=<quantity>; repeatable.
        #[arg(long = "book")]
        bookings: Vec<String>,
        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pica_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Stage { campaign_id, step } => {
            commands::run_stage(&config, &campaign_id, step).await
        }
        Commands::Categories => commands::run_categories(&config).await,
        Commands::PrintTypes => commands::run_print_types(&config).await,
        Commands::Report {
            campaign_id,
            category_id,
            channels,
            format,
            bookings,
            json,
        } => {
            commands::run_report(
                &config,
                commands::ReportArgs {
                    campaign_id,
                    category_id,
                    channels,
                    format,
                    bookings,
                    json,
                },
            )
            .await
        }
    }
}
