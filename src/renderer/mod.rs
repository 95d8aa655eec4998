pub mod chrome;
pub mod http;

use anyhow::Result;
use async_trait::async_trait;

pub use chrome::ChromeRenderer;
pub use http::HttpRenderer;

/// A session that can navigate to a URL and hand back the rendered markup.
///
/// Loading and reading are separate so the caller can let client-side
/// rendering settle in between.
#[async_trait]
pub trait Renderer: Send {
    /// Navigate to `url`. Fails on navigation timeout or transport errors.
    async fn load(&mut self, url: &str) -> Result<()>;

    /// Markup of the currently loaded page.
    async fn page_source(&mut self) -> Result<String>;

    /// End the session.
    async fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
