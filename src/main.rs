use anyhow::Context;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_core::config::{operator_username_from_env_values, resolve_config_path};
use intake_core::{Extractor, IntakeConfig, RecordFormatter};
use intake_sheets::{submit_referral, GoogleSheetsClient};

/// Single-shot intake: one referral document in, one sheet row out.
///
/// Usage: `referral-intake <document>` where the document is a referral PDF or its
/// extracted text.
///
/// # Environment Variables
/// - `INTAKE_CONFIG`: path of the YAML config (default: "intake.yaml")
/// - `INTAKE_SHEETS_TOKEN`: OAuth bearer token for the Sheets API
/// - `USER` / `USERNAME`: local account used to look up the operator name
/// - `RUST_LOG`: log filter (default: info for the intake crates)
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("referral_intake=info".parse()?)
                .add_directive("intake_core=info".parse()?)
                .add_directive("intake_sheets=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let document = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: referral-intake <document>")?;

    let config_path = resolve_config_path(std::env::var_os("INTAKE_CONFIG").map(PathBuf::from));
    let config = IntakeConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let username = operator_username_from_env_values(
        std::env::var("USER").ok(),
        std::env::var("USERNAME").ok(),
    )
    .context("neither USER nor USERNAME is set")?;
    let operator = config.operators().resolve(&username)?;

    let access_token =
        std::env::var("INTAKE_SHEETS_TOKEN").context("INTAKE_SHEETS_TOKEN is not set")?;

    tracing::info!("++ Reading {}", document.display());
    let lines = intake_document::load_lines(&document)?;
    let referral = Extractor::default()
        .extract(&lines, operator)
        .with_context(|| format!("extracting referral from {}", document.display()))?;
    referral.log();

    let sink = GoogleSheetsClient::from_config(&config, access_token)?;
    let row = submit_referral(&sink, &RecordFormatter::default(), &referral)?;
    tracing::info!(
        "++ Wrote referral {} to {} row {}",
        referral.reference_number,
        config.worksheet(),
        row
    );

    Ok(())
}
