//! Best-effort extraction of article fields from free-form model output.
//!
//! Nothing here fails: missing pieces fall back to the topic or to empty values.

use lazy_static::lazy_static;
use regex::Regex;
use tw_core::{slugify, GenerationResult};

lazy_static! {
    static ref TITLE: Regex = Regex::new(r"(?m)^# ([^\r\n]+)\r?$").unwrap();
    static ref META_DESCRIPTION: Regex = Regex::new(r"(?i)Meta description:\s*(.*)").unwrap();
    static ref HEADING: Regex = Regex::new(r"(?m)^#{2,3} ([^\r\n]+)\r?$").unwrap();
}

/// First level 1 heading with visible text
pub fn parse_title(raw: &str) -> Option<String> {
    TITLE
        .captures_iter(raw)
        .map(|caps| caps[1].trim().to_string())
        .find(|title| !title.is_empty())
}

pub fn parse_meta_description(raw: &str) -> String {
    META_DESCRIPTION
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

/// Level 2 and 3 headings in document order, duplicates kept
pub fn parse_headings(raw: &str) -> Vec<String> {
    HEADING
        .captures_iter(raw)
        .map(|caps| caps[1].trim().to_string())
        .filter(|heading| !heading.is_empty())
        .collect()
}

pub fn parse_article(topic: &str, raw: &str) -> GenerationResult {
    GenerationResult {
        title: parse_title(raw).unwrap_or_else(|| topic.to_string()),
        slug: slugify(topic),
        content: raw.trim().to_string(),
        meta_description: parse_meta_description(raw),
        headings: parse_headings(raw),
    }
}
