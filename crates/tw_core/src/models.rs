use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// A one-shot text completion backend.
#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    /// Human readable backend name, used in logs
    fn name(&self) -> &str;

    /// Sends a single prompt and returns the generated text.
    ///
    /// An empty string means the backend answered without any text.
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}
