use async_trait::async_trait;
use scraper::{Html, Selector};
use tw_core::{Error, Result};

pub mod google_trends;
pub mod renderer;
pub mod static_source;

pub use google_trends::{GoogleTrendsScraper, TrendsConfig};
pub use renderer::{HttpRenderer, PageRenderer};
pub use static_source::StaticTrendSource;

#[cfg(feature = "browser")]
pub use renderer::ChromiumRenderer;

/// Upper bound on topics handed to one ingestion run
pub const MAX_TOPICS: usize = 10;

/// Where trending topics come from.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Returns the name of the trends source
    fn source(&self) -> &str;

    /// Topics in descending popularity, trimmed, without empties.
    ///
    /// Never fails: any scraping problem is logged and yields an empty list,
    /// which callers read as "nothing trending this run".
    async fn fetch_trending_topics(&self) -> Vec<String>;
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use super::*;

    pub fn parse_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| Error::Scraping(format!("Invalid selector '{}': {:?}", selector, e)))
    }

    pub fn extract_texts(document: &Html, selector: &str) -> Result<Vec<String>> {
        let selector = parse_selector(selector)?;

        Ok(document
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect())
    }

    /// Visible labels matching `selector`, trimmed, empties dropped, at most `max`
    pub fn extract_topics(html: &str, selector: &str, max: usize) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        Ok(extract_texts(&document, selector)?
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .take(max)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::utils;

    #[test]
    fn test_extract_texts() {
        let html = r#"
            <div class="item">Item 1</div>
            <div class="item">Item <b>2</b></div>
        "#;
        let document = Html::parse_document(html);

        let texts = utils::extract_texts(&document, ".item").unwrap();
        assert_eq!(texts, vec!["Item 1", "Item 2"]);
    }

    #[test]
    fn test_extract_topics_trims_and_drops_empty() {
        let html = r#"
            <table>
              <tr><td><div class="mZ3RIc">  ipl 2025 </div></td></tr>
              <tr><td><div class="mZ3RIc">   </div></td></tr>
              <tr><td><div class="mZ3RIc">monsoon
              </div></td></tr>
              <tr><td><div class="other">not a topic</div></td></tr>
            </table>
        "#;
        let topics = utils::extract_topics(html, ".mZ3RIc", MAX_TOPICS).unwrap();
        assert_eq!(topics, vec!["ipl 2025", "monsoon"]);
    }

    #[test]
    fn test_extract_topics_truncates_in_page_order() {
        let html: String = (1..=15)
            .map(|i| format!("<span class=\"t\">topic {}</span>", i))
            .collect();
        let topics = utils::extract_topics(&html, ".t", MAX_TOPICS).unwrap();
        assert_eq!(topics.len(), 10);
        assert_eq!(topics[0], "topic 1");
        assert_eq!(topics[9], "topic 10");
    }

    #[test]
    fn test_extract_topics_markup_mismatch_is_empty() {
        let topics = utils::extract_topics("<html><body>changed</body></html>", ".mZ3RIc", 10).unwrap();
        assert!(topics.is_empty());
    }

    #[test]
    fn test_invalid_selector() {
        assert!(utils::extract_topics("<p>x</p>", "<<<", 10).is_err());
    }
}
