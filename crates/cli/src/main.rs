use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_core::config::{operator_username_from_env_values, resolve_config_path};
use intake_core::{Extractor, IntakeConfig, NonEmptyText, RecordFormatter, Referral};
use intake_sheets::{find_last_empty_row, rowcol_to_a1, submit_referral, GoogleSheetsClient, TabularSink};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Referral intake tooling")]
struct Cli {
    /// Path of the YAML config
    #[arg(long, global = true, env = "INTAKE_CONFIG")]
    config: Option<PathBuf>,

    /// Operator name to record, instead of looking up the local user
    #[arg(long, global = true)]
    operator: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a referral and print it
    Extract {
        /// Referral PDF or extracted text
        document: PathBuf,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the cell updates a referral would produce
    Cells {
        /// Referral PDF or extracted text
        document: PathBuf,
        /// Target sheet row (1-based)
        #[arg(long)]
        row: u32,
    },
    /// Extract a referral and write it to the sheet
    Submit {
        /// Referral PDF or extracted text
        document: PathBuf,
    },
    /// Show the row the next referral would be written to
    NextRow,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake=info".parse()?)
                .add_directive("intake_core=info".parse()?)
                .add_directive("intake_sheets=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Extract { document, json }) => {
            let referral = extract(&cli, document)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&referral)?);
            } else {
                referral.log();
            }
        }
        Some(Commands::Cells { document, row }) => {
            let referral = extract(&cli, document)?;
            for cell in RecordFormatter::default().format(&referral, *row)? {
                println!("{}\t{}", rowcol_to_a1(cell.row, cell.col)?, cell.value);
            }
        }
        Some(Commands::Submit { document }) => {
            let config = load_config(&cli)?;
            let referral = extract_with(&cli, Some(&config), document)?;
            referral.log();
            let sink = sheets_client(&config)?;
            let row = submit_referral(&sink, &RecordFormatter::default(), &referral)?;
            tracing::info!(
                "++ Wrote referral {} to {} row {}",
                referral.reference_number,
                config.worksheet(),
                row
            );
            println!("Wrote referral {} to row {}", referral.reference_number, row);
        }
        Some(Commands::NextRow) => {
            let config = load_config(&cli)?;
            let sink = sheets_client(&config)?;
            match find_last_empty_row(&sink.all_values()?) {
                Some(row) => println!("{row}"),
                None => println!("No writable row found."),
            }
        }
        None => {
            println!("Use 'intake --help' for commands");
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<IntakeConfig> {
    let path = resolve_config_path(cli.config.clone());
    IntakeConfig::load(&path).with_context(|| format!("loading config from {}", path.display()))
}

fn sheets_client(config: &IntakeConfig) -> anyhow::Result<GoogleSheetsClient> {
    let token = std::env::var("INTAKE_SHEETS_TOKEN").context("INTAKE_SHEETS_TOKEN is not set")?;
    Ok(GoogleSheetsClient::from_config(config, token)?)
}

/// Extract without requiring a config when `--operator` is given.
fn extract(cli: &Cli, document: &Path) -> anyhow::Result<Referral> {
    if cli.operator.is_some() {
        extract_with(cli, None, document)
    } else {
        let config = load_config(cli)?;
        extract_with(cli, Some(&config), document)
    }
}

fn extract_with(
    cli: &Cli,
    config: Option<&IntakeConfig>,
    document: &Path,
) -> anyhow::Result<Referral> {
    let operator = match (&cli.operator, config) {
        (Some(name), _) => NonEmptyText::new(name).context("--operator cannot be empty")?,
        (None, Some(config)) => {
            let username = operator_username_from_env_values(
                std::env::var("USER").ok(),
                std::env::var("USERNAME").ok(),
            )
            .context("neither USER nor USERNAME is set; pass --operator")?;
            config.operators().resolve(&username)?
        }
        (None, None) => anyhow::bail!("no operator: pass --operator or provide a config"),
    };

    tracing::info!("++ Reading {}", document.display());
    let lines = intake_document::load_lines(document)?;
    Extractor::default()
        .extract(&lines, operator)
        .with_context(|| format!("extracting referral from {}", document.display()))
}
