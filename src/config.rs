use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use regex::Regex;
use tracing::warn;

pub const BATCH_SIZE: usize = 8;
pub const DEFAULT_PAGES_TO_SCRAPE: u32 = 1;
pub const DEFAULT_FILENAME: &str = "realtor_data";
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(8);

static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap());

/// Settings taken from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Page URLs are this string followed by the page number.
    pub base_url: String,
    pub settle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        let settle = match env::var("SETTLE_SECS") {
            Ok(v) => Duration::from_secs(
                v.parse()
                    .context("SETTLE_SECS must be a whole number of seconds")?,
            ),
            Err(_) => DEFAULT_SETTLE,
        };

        Ok(Self {
            base_url: env::var("WEBSITE_URL").context("WEBSITE_URL must be set")?,
            settle,
        })
    }
}

/// Page count from user input; anything but a positive integer falls back to
/// the default.
pub fn check_pages(input: &str) -> u32 {
    match input.parse::<u32>() {
        Ok(n) if n > 0 && input.bytes().all(|b| b.is_ascii_digit()) => n,
        _ => {
            warn!("Seems like you entered an invalid number: {:?}", input);
            warn!("We'll set input pages to {}", DEFAULT_PAGES_TO_SCRAPE);
            DEFAULT_PAGES_TO_SCRAPE
        }
    }
}

/// Output name from user input; names outside `[A-Za-z0-9_.-]` fall back to
/// the default.
pub fn check_filename(input: &str) -> String {
    if FILENAME_RE.is_match(input) {
        input.to_string()
    } else {
        warn!(
            "Seems like you entered an invalid file name that is not in the set [0-9a-zA-Z-_.]: {:?}",
            input
        );
        warn!("We're going to set the filename to: {}.csv", DEFAULT_FILENAME);
        DEFAULT_FILENAME.to_string()
    }
}
