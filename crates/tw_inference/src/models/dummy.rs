use std::fmt;
use tw_core::{InferenceModel, Result};

/// Offline backend that answers every prompt with a small, well-formed article.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Pulls the `**"topic"**` marker back out of a prompt
fn topic_from_prompt(prompt: &str) -> Option<&str> {
    let start = prompt.find("**\"")? + 3;
    let len = prompt[start..].find("\"**")?;
    Some(&prompt[start..start + len])
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let topic = topic_from_prompt(prompt).unwrap_or("Today's trend");
        Ok(format!(
            "# {topic}: What You Need to Know\n\n\
             Meta description: A quick, friendly overview of {topic}.\n\n\
             ## Introduction\n\n\
             {topic} is trending right now. Here is why.\n\n\
             ## Why It Matters\n\n\
             People are searching for {topic} more than usual.\n\n\
             ### A Quick Example\n\n\
             See [Google Trends](https://trends.google.com) for the numbers.\n\n\
             ## Conclusion\n\n\
             Stay curious with TrendWise, your source for simplified insights.\n"
        ))
    }
}
