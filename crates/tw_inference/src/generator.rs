use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};
use tw_core::{Error, GenerationResult, InferenceModel, Result};

use crate::parse::parse_article;
use crate::prompt::build_prompt;

/// Turns a topic into a parsed article using an injected completion backend.
pub struct ArticleGenerator {
    model: Arc<dyn InferenceModel>,
}

impl fmt::Debug for ArticleGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleGenerator")
            .field("model", &self.model.name())
            .finish()
    }
}

impl ArticleGenerator {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Generates one article.
    ///
    /// Every failure comes back as [`Error::Generation`] and only concerns this topic.
    #[instrument(skip(self), level = "debug")]
    pub async fn generate(&self, topic: &str) -> Result<GenerationResult> {
        let prompt = build_prompt(topic);
        if prompt.trim().is_empty() {
            return Err(Error::Generation(format!("empty prompt for topic '{}'", topic)));
        }

        let raw = self
            .model
            .generate_text(&prompt)
            .await
            .map_err(|e| Error::Generation(format!("{} request failed: {}", self.model.name(), e)))?;

        if raw.trim().is_empty() {
            return Err(Error::Generation(format!(
                "{} returned no text for topic '{}'",
                self.model.name(),
                topic
            )));
        }

        debug!(chars = raw.len(), "Received generated text");
        Ok(parse_article(topic, &raw))
    }
}
