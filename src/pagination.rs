use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

use crate::parser::{extract_page, has_listings};
use crate::record::PageRecords;
use crate::renderer::Renderer;
use crate::sink::Sink;

/// How long to let client-side rendering run before reading a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// Wait a fixed delay after every load.
    Fixed(Duration),
    /// Re-read the page every `poll` until a listing card shows up or
    /// `timeout` has passed, then use whatever is there.
    UntilListings { timeout: Duration, poll: Duration },
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub base_url: String,
    pub total_pages: u32,
    pub batch_size: usize,
    pub settle: Settle,
}

/// Totals returned after a completed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub pages: u32,
    pub batches: usize,
    pub records: usize,
}

/// Split `1..=total_pages` into consecutive ranges of at most `batch_size`.
pub fn batches(total_pages: u32, batch_size: usize) -> Vec<RangeInclusive<u32>> {
    let size = u32::try_from(batch_size.max(1)).unwrap_or(u32::MAX);
    (1..=total_pages)
        .step_by(size as usize)
        .map(|start| start..=total_pages.min(start.saturating_add(size - 1)))
        .collect()
}

pub fn page_url(base_url: &str, page_num: u32) -> String {
    format!("{}{}", base_url, page_num)
}

/// Render every page in order, extract its listings, and append each batch
/// to `sink` once all of the batch's pages have succeeded.
///
/// Any renderer, extraction or sink failure ends the run. Batches written
/// before the failure stay on disk; the failing batch is never written.
pub async fn run<R, S>(renderer: &mut R, sink: &mut S, opts: &RunOptions) -> Result<RunStats>
where
    R: Renderer + ?Sized,
    S: Sink + ?Sized,
{
    let pb = ProgressBar::new(u64::from(opts.total_pages));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut stats = RunStats::default();
    let mut buffer: Vec<PageRecords> = Vec::with_capacity(opts.batch_size.max(1));

    for range in batches(opts.total_pages, opts.batch_size) {
        for page_num in range.clone() {
            let url = page_url(&opts.base_url, page_num);
            info!("Rendering url: {}", url);

            let records = render_page(renderer, &url, opts.settle).await?;
            stats.pages += 1;
            stats.records += records.len();
            buffer.push(records);
            pb.inc(1);
        }

        info!("Writing batch for pages {} to {}", range.start(), range.end());
        if let Err(e) = sink.append(&buffer) {
            error!("{}", e);
            pb.abandon();
            return Err(e).with_context(|| {
                format!("Batch for pages {} to {} was not written", range.start(), range.end())
            });
        }
        buffer.clear();
        stats.batches += 1;
        info!("Wrote batch above to CSV");
    }

    pb.finish_and_clear();
    Ok(stats)
}

async fn render_page<R>(renderer: &mut R, url: &str, settle: Settle) -> Result<PageRecords>
where
    R: Renderer + ?Sized,
{
    let html = match load_settled(renderer, url, settle).await {
        Ok(html) => html,
        Err(e) => {
            error!("Could not load page {}, more info: {:#}", url, e);
            return Err(e);
        }
    };

    let document = Html::parse_document(&html);
    let records =
        extract_page(&document).with_context(|| format!("Extraction failed for {}", url))?;
    debug!("Found {} listings on {}", records.len(), url);
    Ok(records)
}

async fn load_settled<R>(renderer: &mut R, url: &str, settle: Settle) -> Result<String>
where
    R: Renderer + ?Sized,
{
    renderer.load(url).await?;

    match settle {
        Settle::Fixed(delay) => {
            sleep(delay).await;
            renderer.page_source().await
        }
        Settle::UntilListings { timeout, poll } => {
            let deadline = Instant::now() + timeout;
            loop {
                let html = renderer.page_source().await?;
                if has_listings(&Html::parse_document(&html)) {
                    return Ok(html);
                }
                if Instant::now() >= deadline {
                    debug!("No listings on {} after {:?}, reading as-is", url, timeout);
                    return Ok(html);
                }
                sleep(poll).await;
            }
        }
    }
}
