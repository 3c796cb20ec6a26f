use async_trait::async_trait;

use super::TrendSource;

/// A fixed list of topics, for operator supplied topics and tests
#[derive(Debug, Clone, Default)]
pub struct StaticTrendSource {
    topics: Vec<String>,
}

impl StaticTrendSource {
    /// Applies the same cleanup as a real scrape: trimmed, no empties
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics
                .into_iter()
                .map(|t| t.into().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

#[async_trait]
impl TrendSource for StaticTrendSource {
    fn source(&self) -> &str {
        "static"
    }

    async fn fetch_trending_topics(&self) -> Vec<String> {
        self.topics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_topics_are_cleaned() {
        let source = StaticTrendSource::new(["  a  ", "", "b"]);
        assert_eq!(source.fetch_trending_topics().await, vec!["a", "b"]);
    }
}
