use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use super::Renderer;

/// Plain HTTP fetch, no script execution. Suitable for server-rendered
/// directory pages or saved mirrors.
pub struct HttpRenderer {
    client: reqwest::Client,
    body: Option<String>,
}

impl HttpRenderer {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, body: None })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn load(&mut self, url: &str) -> Result<()> {
        self.body = None;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("HTTP request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {} for {}", status, url);
        }

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;
        self.body = Some(body);
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String> {
        self.body.clone().context("No page loaded")
    }
}
