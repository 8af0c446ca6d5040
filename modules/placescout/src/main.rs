use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use placescout::config::ScoutConfig;
use placescout::sink::CsvSink;
use placescout::target::{CancelFlag, TargetRunner};
use webdriver_client::WebDriverSurface;

/// Incremental place/review scraper for an infinite-scroll map listing surface.
#[derive(Parser, Debug)]
#[command(name = "placescout")]
struct Cli {
    /// Single target identifier (URL fragment selecting the starting view).
    /// Without it, targets are read from targets.txt.
    #[arg(short, long)]
    search: Option<String>,

    /// Cap on listings per target.
    #[arg(short, long)]
    total: Option<usize>,

    /// Directory for per-target CSV files.
    #[arg(long, default_value = "output")]
    output: String,

    /// WebDriver server to drive the browser through.
    #[arg(long, default_value = "http://localhost:9515")]
    webdriver_url: String,
}

const TARGETS_FILE: &str = "targets.txt";

fn load_targets(cli: &Cli) -> Result<Vec<String>> {
    if let Some(search) = &cli.search {
        return Ok(vec![search.clone()]);
    }

    let targets: Vec<String> = match std::fs::read_to_string(TARGETS_FILE) {
        Ok(contents) => contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        Err(_) => Vec::new(),
    };

    if targets.is_empty() {
        bail!("No targets: pass --search or list targets in {TARGETS_FILE}");
    }
    Ok(targets)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("placescout=info".parse()?))
        .init();

    let cli = Cli::parse();
    let targets = load_targets(&cli)?;

    let mut config = ScoutConfig::from_env();
    if let Some(total) = cli.total {
        config.listing_cap = total;
    }
    config.output_dir = cli.output.clone().into();

    info!(targets = targets.len(), "PlaceScout starting");

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Ctrl-C received, finishing the current listing then stopping");
                cancel.cancel();
            }
        });
    }

    let surface = WebDriverSurface::connect(&cli.webdriver_url)
        .await
        .context("Failed to start WebDriver session")?;

    let sink = Arc::new(CsvSink::new(config.output_dir.clone()));
    let runner = TargetRunner::new(config, sink, cancel);
    let result = runner.run_all(&surface, &targets).await;

    if let Err(e) = surface.quit().await {
        warn!(error = %e, "Failed to shut down WebDriver session");
    }

    let stats = result?;
    info!("Run complete. {stats}");
    Ok(())
}
