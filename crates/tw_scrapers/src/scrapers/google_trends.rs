use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tw_core::{Error, Result};
use url::Url;

use super::renderer::PageRenderer;
use super::{utils, TrendSource, MAX_TOPICS};

pub const DEFAULT_BASE_URL: &str = "https://trends.google.com/trending";
pub const DEFAULT_GEO: &str = "IN";
/// Class of the topic label cells on the trending listing
pub const DEFAULT_SELECTOR: &str = ".mZ3RIc";

#[derive(Debug, Clone)]
pub struct TrendsConfig {
    pub base_url: String,
    /// Region code passed as `geo`
    pub geo: String,
    pub selector: String,
    pub max_topics: usize,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            geo: DEFAULT_GEO.to_string(),
            selector: DEFAULT_SELECTOR.to_string(),
            max_topics: MAX_TOPICS,
        }
    }
}

impl TrendsConfig {
    pub fn url(&self) -> Result<Url> {
        Url::parse_with_params(&self.base_url, &[("geo", self.geo.as_str())])
            .map_err(|e| Error::Scraping(format!("Failed to build trends URL: {}", e)))
    }
}

pub struct GoogleTrendsScraper {
    renderer: Arc<dyn PageRenderer>,
    config: TrendsConfig,
}

impl GoogleTrendsScraper {
    pub fn new(renderer: Arc<dyn PageRenderer>, config: TrendsConfig) -> Self {
        Self { renderer, config }
    }

    pub fn config(&self) -> &TrendsConfig {
        &self.config
    }

    /// The fallible part of the scrape, kept separate so the trait method can
    /// turn every failure into an empty list.
    pub async fn scrape_topics(&self) -> Result<Vec<String>> {
        let url = self.config.url()?;
        debug!(url = %url, renderer = self.renderer.name(), "Loading trends page");

        let html = self
            .renderer
            .render(url.as_str(), Some(self.config.selector.as_str()))
            .await?;

        utils::extract_topics(&html, &self.config.selector, self.config.max_topics.min(MAX_TOPICS))
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsScraper {
    fn source(&self) -> &str {
        "Google Trends"
    }

    async fn fetch_trending_topics(&self) -> Vec<String> {
        match self.scrape_topics().await {
            Ok(topics) => {
                if topics.is_empty() {
                    warn!(
                        selector = %self.config.selector,
                        "📉 No trending topics found, the page markup may have changed"
                    );
                } else {
                    info!(count = topics.len(), geo = %self.config.geo, "📈 Fetched trending topics");
                }
                topics
            }
            Err(e) => {
                warn!(error = %e, "📉 Failed to scrape trending topics");
                Vec::new()
            }
        }
    }
}
