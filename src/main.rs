mod export;
mod models;
mod runner;
mod scrapers;

use runner::TargetStatus;
use scrapers::{ChromeSession, ScrapeConfig, Target};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🛒 Listing Scout - webscraper.io e-commerce demo");
    info!("================================================");

    let config = ScrapeConfig::default();
    info!("Entry page: {}", config.home_url()?);

    let session = ChromeSession::launch(&config)?;
    let report = runner::run(&session, &config);
    session.close();

    for (name, status) in &report.outcomes {
        match status {
            TargetStatus::Written { rows, complete: true } => info!("✅ {}: {} rows", name, rows),
            TargetStatus::Written { rows, complete: false } => {
                info!("⚠️  {}: {} rows (partial)", name, rows)
            }
            TargetStatus::Failed(reason) => info!("❌ {}: {}", name, reason),
        }
    }

    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!("{} of {} targets failed", failures, Target::ALL.len());
    }

    Ok(())
}
