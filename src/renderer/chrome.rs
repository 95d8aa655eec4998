use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::Renderer;

pub struct ChromeOptions {
    pub headful: bool,
    pub nav_timeout: Duration,
}

/// One Chrome session with a single tab, reused for every page.
pub struct ChromeRenderer {
    browser: Browser,
    page: Page,
    events: JoinHandle<()>,
}

impl ChromeRenderer {
    pub async fn launch(opts: &ChromeOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(opts.nav_timeout)
            .arg("--enable-javascript");
        if opts.headful {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("Invalid browser config: {}", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch Chrome")?;

        // The CDP connection only makes progress while its handler is polled.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to open browser tab")?;

        info!("Created Chrome session (headful: {})", opts.headful);
        Ok(Self {
            browser,
            page,
            events,
        })
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn load(&mut self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Navigation to {} failed", url))?;
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String> {
        self.page
            .content()
            .await
            .context("Failed to read page source")
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.browser.close().await.context("Failed to close Chrome")?;
        self.browser.wait().await.context("Chrome did not exit")?;
        self.events.abort();
        info!("Chrome session closed");
        Ok(())
    }
}
