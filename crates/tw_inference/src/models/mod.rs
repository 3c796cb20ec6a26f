use std::sync::Arc;
use tw_core::{Error, InferenceModel, Result};

use crate::Config;

pub mod deepseek;
pub mod dummy;
pub mod gemini;

pub use deepseek::DeepSeekModel;
pub use dummy::DummyModel;
pub use gemini::GeminiModel;

/// Builds the completion backend named in `config.model`.
///
/// Remote backends need an API key; a missing key is reported here, at start-up,
/// rather than on every topic.
pub fn create_model(config: &Config) -> Result<Arc<dyn InferenceModel>> {
    match config.model.to_lowercase().as_str() {
        "gemini" => Ok(Arc::new(GeminiModel::new(config)?)),
        "deepseek" => Ok(Arc::new(DeepSeekModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Config(format!(
            "Unknown model '{}'. Available models: gemini (default), deepseek, dummy",
            other
        ))),
    }
}
