mod audience_client;
mod config;
mod destination;
mod errors;
mod hashing;
mod models;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::audience_client::MetaAudienceClient;
use crate::config::Config;
use crate::destination::Destination;
use crate::models::{RunResult, UserRow};

fn print_usage() {
    eprintln!("Usage: meta-audience-connector <rows.json> [--dry-run]");
    eprintln!("       meta-audience-connector --schema");
    eprintln!();
    eprintln!("Reads a JSON array of user rows and uploads their hashed emails");
    eprintln!("to the configured Meta Custom Audience. Credentials come from the");
    eprintln!("environment: META_ACCESS_TOKEN, META_APP_SECRET, META_APP_ID,");
    eprintln!("META_AUDIENCE_ID (and optionally META_GRAPH_BASE_URL).");
    eprintln!();
    eprintln!("--schema prints the connector's config field descriptors as JSON.");
}

/// Main entry point for the uploader.
///
/// Initializes tracing, loads configuration from the environment, reads the
/// input rows, and runs the connector one batch at a time. Batching
/// discipline lives here, not in the connector: the input is chunked to the
/// connector's advertised batch size.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok on a run where at least one batch succeeded
///   (or a clean dry run), or an error on setup/total failure.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meta_audience_connector=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse arguments: input file plus optional --dry-run
    let mut input_path: Option<String> = None;
    let mut dry_run = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--schema" => {
                let schema = Destination::<MetaAudienceClient>::schema();
                println!("{}", serde_json::to_string_pretty(&schema)?);
                return Ok(());
            }
            path if input_path.is_none() => input_path = Some(path.to_string()),
            unexpected => anyhow::bail!("Unexpected argument: {}", unexpected),
        }
    }
    let input_path = match input_path {
        Some(path) => path,
        None => {
            print_usage();
            anyhow::bail!("Missing input file argument");
        }
    };

    // Load configuration
    let config = Config::from_env()?;

    // Build the connector and gate on config validation before any work
    let destination = Destination::new(config)?;
    let validation = destination.validate();
    if !validation.is_valid {
        anyhow::bail!(
            "Configuration invalid: {}",
            validation
                .error_message
                .unwrap_or_else(|| "unknown validation failure".to_string())
        );
    }
    tracing::info!("Configuration validated");

    // Read input rows
    let raw = tokio::fs::read_to_string(&input_path)
        .await
        .with_context(|| format!("Failed to read input file '{}'", input_path))?;
    let rows: Vec<UserRow> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse '{}' as a JSON array of rows", input_path))?;
    tracing::info!("Loaded {} rows from {}", rows.len(), input_path);

    if dry_run {
        tracing::info!("Dry run requested, no data will be submitted");
    }

    // The connector does not subdivide input; chunk to its advertised size here
    let mut totals = RunResult::new(dry_run, 0, 0);
    let batch_size = destination.batch_size();
    for (batch_index, batch) in rows.chunks(batch_size).enumerate() {
        tracing::info!("Sending batch {} ({} rows)", batch_index, batch.len());
        let result = destination.send_data(batch, dry_run).await;

        totals.successful_hits += result.successful_hits;
        totals.failed_hits += result.failed_hits;
        totals.error_messages.extend(result.error_messages);
    }

    tracing::info!(
        "Run complete: {} successful, {} failed",
        totals.successful_hits,
        totals.failed_hits
    );
    println!("{}", serde_json::to_string_pretty(&totals)?);

    if !rows.is_empty() && totals.successful_hits == 0 && totals.failed_hits > 0 {
        anyhow::bail!("All {} rows failed", totals.failed_hits);
    }

    Ok(())
}
