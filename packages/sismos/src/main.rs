// Entry point for one scheduled ETL run.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sismos::{handler, Config, HttpFetcher, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(table = %config.table_name, "Starting IGP snapshot run");

    let store = SqliteStore::new(&config.database_url, &config.table_name)
        .await
        .context("Failed to open snapshot store")?;
    let fetcher = HttpFetcher::for_report_page().context("Failed to build HTTP client")?;

    let outcome = handler::run(&fetcher, &store).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    // Non-success exits non-zero so the scheduling layer can alert/retry.
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
