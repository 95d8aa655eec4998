mod config;
mod pagination;
mod parser;
mod record;
mod renderer;
mod sink;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use config::{check_filename, check_pages, Config, BATCH_SIZE, DEFAULT_FILENAME, DEFAULT_PAGES_TO_SCRAPE};
use pagination::{RunOptions, Settle};
use renderer::chrome::ChromeOptions;
use renderer::{ChromeRenderer, HttpRenderer, Renderer};
use sink::CsvSink;

const CARD_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(
    name = "realtor_scraper",
    about = "Scrape realtor contact cards from a paginated directory into CSV"
)]
struct Cli {
    /// Number of pages to scrape (invalid values fall back to 1)
    #[arg(allow_hyphen_values = true)]
    pages: Option<String>,
    /// Output file name without extension (invalid names fall back to realtor_data)
    filename: Option<String>,
    /// Pages rendered before each write to the output file
    #[arg(long, default_value_t = BATCH_SIZE)]
    batch_size: usize,
    /// Fixed wait after each page load (default: SETTLE_SECS or 8)
    #[arg(long, value_name = "SECS")]
    settle_secs: Option<u64>,
    /// Poll each page until a listing card appears, giving up after SECS
    #[arg(long, value_name = "SECS", conflicts_with = "settle_secs")]
    wait_for_cards: Option<u64>,
    /// Directory the CSV file is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = RendererKind::Chrome)]
    renderer: RendererKind,
    /// Show the browser window
    #[arg(long)]
    headful: bool,
    /// Navigation timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    nav_timeout: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum RendererKind {
    /// Headless Chrome, runs the page's JavaScript
    Chrome,
    /// Plain HTTP fetch, for server-rendered pages
    Http,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();

    if let Err(e) = scrape(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    info!("Done in {}", format_duration(t0.elapsed()));
}

async fn scrape(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;

    let total_pages = cli
        .pages
        .as_deref()
        .map_or(DEFAULT_PAGES_TO_SCRAPE, check_pages);
    let filename = cli
        .filename
        .as_deref()
        .map_or_else(|| DEFAULT_FILENAME.to_string(), check_filename);
    if cli.batch_size == 0 {
        warn!("Batch size must be at least 1, using 1");
    }
    info!("pages input: {} filename: {}", total_pages, filename);

    let settle = match cli.wait_for_cards {
        Some(secs) => Settle::UntilListings {
            timeout: Duration::from_secs(secs),
            poll: CARD_POLL_INTERVAL,
        },
        None => Settle::Fixed(
            cli.settle_secs
                .map(Duration::from_secs)
                .unwrap_or(config.settle),
        ),
    };
    let opts = RunOptions {
        base_url: config.base_url,
        total_pages,
        batch_size: cli.batch_size.max(1),
        settle,
    };

    let mut sink = CsvSink::create(&cli.out_dir, &filename)?;
    info!("Created {}", sink.path().display());

    let nav_timeout = Duration::from_secs(cli.nav_timeout);
    let mut renderer: Box<dyn Renderer> = match cli.renderer {
        RendererKind::Chrome => {
            let chrome = ChromeRenderer::launch(&ChromeOptions {
                headful: cli.headful,
                nav_timeout,
            })
            .await;
            match chrome {
                Ok(chrome) => Box::new(chrome),
                Err(e) => {
                    error!("Something went wrong with browser setup: {:#}", e);
                    return Err(e);
                }
            }
        }
        RendererKind::Http => Box::new(HttpRenderer::new(nav_timeout)?),
    };

    let outcome = pagination::run(renderer.as_mut(), &mut sink, &opts).await;
    if let Err(e) = renderer.shutdown().await {
        warn!("{:#}", e);
    }
    let stats = outcome?;

    info!(
        "Scraped {} pages ({} records, {} batches) into {}",
        stats.pages,
        stats.records,
        stats.batches,
        sink.path().display()
    );
    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
