//! Fetching the HTML of a trends page.
//!
//! The trends listing is rendered client side, so the real adapter drives a
//! headless Chromium (`browser` feature). [`HttpRenderer`] only sees the server
//! HTML and is kept for builds without a browser.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use tw_core::{Error, Result};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) trendwise/0.1";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait PageRenderer: Send + Sync {
    fn name(&self) -> &str;

    /// Loads `url` and returns the resulting HTML.
    ///
    /// When `wait_for` is set the renderer gives the page a bounded amount of
    /// time to produce an element matching that CSS selector.
    async fn render(&self, url: &str, wait_for: Option<&str>) -> Result<String>;
}

pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    fn name(&self) -> &str {
        "http"
    }

    async fn render(&self, url: &str, _wait_for: Option<&str>) -> Result<String> {
        debug!(url, "Fetching page over HTTP");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(feature = "browser")]
pub use chromium::ChromiumRenderer;

#[cfg(feature = "browser")]
mod chromium {
    use super::*;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use chromiumoxide::Page;
    use futures::StreamExt;
    use tracing::warn;

    const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(500);
    const SELECTOR_POLL_ATTEMPTS: u32 = 20;

    fn cdp_error(context: &str, e: impl std::fmt::Display) -> Error {
        Error::Scraping(format!("{}: {}", context, e))
    }

    /// Launches a fresh headless Chromium for every render and always shuts it down.
    #[derive(Debug, Default, Clone)]
    pub struct ChromiumRenderer {
        /// Disable the Chromium sandbox, needed when running as root in containers
        pub no_sandbox: bool,
    }

    impl ChromiumRenderer {
        pub fn new(no_sandbox: bool) -> Self {
            Self { no_sandbox }
        }

        async fn load(page: &Page, wait_for: Option<&str>) -> Result<String> {
            page.wait_for_navigation()
                .await
                .map_err(|e| cdp_error("Navigation failed", e))?;

            if let Some(selector) = wait_for {
                let mut found = false;
                for _ in 0..SELECTOR_POLL_ATTEMPTS {
                    if page.find_element(selector).await.is_ok() {
                        found = true;
                        break;
                    }
                    tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
                }
                if !found {
                    debug!(selector, "Selector never appeared, using page as is");
                }
            }

            page.content()
                .await
                .map_err(|e| cdp_error("Failed to read page content", e))
        }
    }

    #[async_trait]
    impl PageRenderer for ChromiumRenderer {
        fn name(&self) -> &str {
            "chromium"
        }

        async fn render(&self, url: &str, wait_for: Option<&str>) -> Result<String> {
            let mut builder = BrowserConfig::builder();
            if self.no_sandbox {
                builder = builder.no_sandbox();
            }
            let config = builder
                .build()
                .map_err(|e| cdp_error("Invalid browser config", e))?;

            let (mut browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| cdp_error("Failed to launch browser", e))?;

            let handler_task = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            debug!(url, "Rendering page in headless browser");
            let result = match browser.new_page(url).await {
                Ok(page) => Self::load(&page, wait_for).await,
                Err(e) => Err(cdp_error("Failed to open page", e)),
            };

            // The browser goes away whatever happened above.
            if let Err(e) = browser.close().await {
                warn!(error = %e, "Failed to close browser");
            }
            if let Err(e) = browser.wait().await {
                warn!(error = %e, "Failed to wait for browser exit");
            }
            handler_task.abort();

            result
        }
    }
}
