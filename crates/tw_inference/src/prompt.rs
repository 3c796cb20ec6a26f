//! Instruction text sent to the model for each topic.
//!
//! The output format requested here is exactly what [`crate::parse`] reads back.
//! Changing any of the marker tokens below means changing the parser too.

/// Prefix of the single H1 title line
pub const TITLE_PREFIX: &str = "# ";

/// Label of the line carrying the SEO meta description
pub const META_DESCRIPTION_LABEL: &str = "Meta description:";

/// Upper bound asked of the model; not enforced on the parsed value
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;

pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"
You are a professional blog writer who explains things simply, like a friendly human would. Write a clear, beginner-friendly and SEO-optimized article on the topic: **"{topic}"**.

## Instructions
1. Format the whole answer as **Markdown**; it is rendered directly on a website.
2. Start with exactly one compelling H1 title line beginning with `{title}`.
3. Right below the title add one line starting with `{meta}` followed by a summary of at most {max} characters.
4. Keep a conversational tone, short sentences and no jargon.
5. Split the article into logical parts with `##` and `###` subheadings.
6. Stick to the important content, no filler.
7. Link to a few relevant, credible resources (Wikipedia, Google Trends, news articles).
8. Optionally include 1-2 relevant YouTube links, a quoted tweet, an image with alt text or a simple chart.
9. End with a short summary and a friendly call to action such as:
   *"Stay curious with TrendWise, your source for simplified insights."*

## Output format
```md
{title}[Catchy title for the topic]

{meta} [Short, clear summary of the article]

## Introduction

[A short intro that hooks the reader]

## [Main point #1]

[Simple explanation with a helpful link]

### [Optional subpoint or example]

[Short example illustrating the idea]

## [Main point #2, tips or steps]

[Structured content]

## Conclusion

[Key takeaway and an uplifting closing note]
```
"#,
        topic = topic,
        title = TITLE_PREFIX,
        meta = META_DESCRIPTION_LABEL,
        max = META_DESCRIPTION_MAX_CHARS,
    )
}
