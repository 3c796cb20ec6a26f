use std::fmt;

pub mod models;
pub mod generator;
pub mod parse;
pub mod prompt;

pub use generator::ArticleGenerator;
pub use models::create_model;

pub const DEFAULT_MODEL: &str = "gemini";

#[derive(Clone)]
pub struct Config {
    /// Backend to use: `gemini`, `deepseek` or `dummy`
    pub model: String,
    /// Backend specific model identifier, e.g. `gemini-1.5-flash`
    pub model_name: Option<String>,
    pub api_key: Option<String>,
    /// Overrides the backend's API base URL
    pub base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("model", &self.model)
            .field("model_name", &self.model_name)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            model_name: None,
            api_key: None,
            base_url: None,
        }
    }
}

