//! CLI administration tool for ene-analytics.
//!
//! Inspects the configured record source and exports chart payloads
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List the quarters covered by the data
//! cargo run --bin admin -- quarters
//!
//! # List region options
//! cargo run --bin admin -- regions
//!
//! # Export a chart payload as JSON
//! cargo run --bin admin -- chart unemployment --regions 13 --age-min 2 --output chart.json
//!
//! # Check that the record source is reachable
//! cargo run --bin admin -- source check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATA_SOURCE`, `DATA_DIR`, `DATABASE_URL`.

use ene_analytics::api::dto::charts::ChartQuery;
use ene_analytics::api::dto::lookups::QuarterItem;
use ene_analytics::application::services::ChartService;
use ene_analytics::config::{self, Config};
use ene_analytics::domain::aggregation::GenderSlice;
use ene_analytics::domain::chart::ChartVariant;
use ene_analytics::domain::repositories::SurveyRepository;
use ene_analytics::server::build_repository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;

/// CLI tool for inspecting ene-analytics data.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// List the quarters of the data set
    Quarters,

    /// List region options
    Regions,

    /// Build a chart payload and print or save it
    Chart {
        /// Chart name (unemployment, unemployment-by-age, participation, ...)
        variant: String,

        /// Region selection: `all`, a code, or a list such as `1,2`
        #[arg(short, long)]
        regions: Option<String>,

        /// Lowest age bracket
        #[arg(long)]
        age_min: Option<u8>,

        /// Highest age bracket
        #[arg(long)]
        age_max: Option<u8>,

        /// First quarter position (see `quarters`)
        #[arg(long)]
        date_from: Option<usize>,

        /// Last quarter position (see `quarters`)
        #[arg(long)]
        date_to: Option<usize>,

        /// Population slice of the by-age chart
        #[arg(short, long, value_enum, default_value_t = GenderArg::All)]
        gender: GenderArg,

        /// Write the payload to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the output file without asking
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Record source operations
    Source {
        #[command(subcommand)]
        action: SourceAction,
    },
}

/// Record source subcommands.
#[derive(Subcommand)]
enum SourceAction {
    /// Check that the source is reachable
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    All,
    Male,
    Female,
}

impl From<GenderArg> for GenderSlice {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::All => GenderSlice::All,
            GenderArg::Male => GenderSlice::Male,
            GenderArg::Female => GenderSlice::Female,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let repository = build_repository(&config).await?;
    let service = ChartService::new(repository);

    match cli.command {
        Commands::Quarters => list_quarters(&service).await?,
        Commands::Regions => list_regions(&service).await?,
        Commands::Chart {
            variant,
            regions,
            age_min,
            age_max,
            date_from,
            date_to,
            gender,
            output,
            yes,
        } => {
            let query = ChartQuery {
                regions,
                age_min,
                age_max,
                date_from,
                date_to,
                gender: gender.into(),
            };
            export_chart(&service, &variant, &query, output, yes).await?;
        }
        Commands::Source { action } => handle_source_action(action, &service, &config).await?,
    }

    Ok(())
}

/// Prints the quarter list with the positions date filters refer to.
///
/// # Output Format
///
/// ```text
/// 📅 Quarters
///
///   Pos  Label          Key
///   ──────────────────────────────
///   0    Q4 2019        8080
///   1    Q1 2020        8081
/// ```
async fn list_quarters(service: &ChartService<dyn SurveyRepository>) -> Result<()> {
    println!("{}", "📅 Quarters".bright_blue().bold());
    println!();

    let quarters = QuarterItem::from_periods(&service.quarters().await?);

    if quarters.is_empty() {
        println!("{}", "  No survey data found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<14} {}",
        "Pos".bright_white().bold(),
        "Label".bright_white().bold(),
        "Key".bright_white().bold()
    );
    println!("  {}", "─".repeat(30).bright_black());

    for item in &quarters {
        let label = if item.mark {
            item.label.cyan()
        } else {
            item.label.normal()
        };
        println!(
            "  {:<4} {:<14} {}",
            item.index.to_string().bright_black(),
            label,
            item.key.to_string().bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        quarters.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn list_regions(service: &ChartService<dyn SurveyRepository>) -> Result<()> {
    println!("{}", "🗺  Regions".bright_blue().bold());
    println!();

    let regions = service.regions().await?;

    println!(
        "  {:<12} {}",
        "Value".bright_white().bold(),
        "Name".bright_white().bold()
    );
    println!("  {}", "─".repeat(50).bright_black());

    for option in &regions {
        println!(
            "  {:<12} {}",
            option.selection.to_string().bright_black(),
            option.name.cyan()
        );
    }

    println!();
    Ok(())
}

/// Builds a chart payload and writes it as pretty JSON.
///
/// Asks before overwriting an existing file unless `--yes` is given.
async fn export_chart(
    service: &ChartService<dyn SurveyRepository>,
    variant: &str,
    query: &ChartQuery,
    output: Option<PathBuf>,
    skip_confirm: bool,
) -> Result<()> {
    let variant: ChartVariant = variant.parse()?;
    let filter = query.to_filter()?;

    let payload = service.chart(variant, &filter, query.gender).await?;
    let json = serde_json::to_string_pretty(&payload)?;

    let Some(path) = output else {
        println!("{json}");
        return Ok(());
    };

    if path.exists() && !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} {} ({} traces) -> {}",
        "✅ Chart written:".green().bold(),
        payload.layout.title.text.cyan(),
        payload.data.len(),
        path.display().to_string().bright_white()
    );

    Ok(())
}

/// Handles record source diagnostics.
async fn handle_source_action(
    action: SourceAction,
    service: &ChartService<dyn SurveyRepository>,
    config: &Config,
) -> Result<()> {
    match action {
        SourceAction::Check => {
            println!(
                "{} {}",
                "🔍 Checking record source:".bright_blue(),
                config.data_source.to_string().bright_white()
            );

            service
                .health()
                .await
                .map_err(|e| anyhow::anyhow!("Record source unavailable: {}", e))?;

            println!("{}", "✅ Record source OK".green().bold());
        }
    }

    Ok(())
}
