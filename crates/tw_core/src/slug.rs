use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Derives the article slug for a topic: lowercase, whitespace runs collapsed to `-`.
///
/// The slug is the deduplication key of the whole pipeline, so it depends on the
/// topic text only and never on anything the model produced.
pub fn slugify(topic: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&topic.to_lowercase(), "-")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("The Future of Solar Energy"), "the-future-of-solar-energy");
        assert_eq!(slugify("IPL 2025"), "ipl-2025");
    }

    #[test]
    fn test_slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("india  vs\tengland\n"), "india-vs-england-");
        assert_eq!(slugify("a\u{00a0}b"), "a-b");
    }

    #[test]
    fn test_slugify_keeps_other_characters() {
        assert_eq!(slugify("Café Olé!"), "café-olé!");
        assert_eq!(slugify("already-slugged"), "already-slugged");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        let topic = "Stock Market Today";
        assert_eq!(slugify(topic), slugify(topic));
        assert_eq!(slugify(topic), slugify(&topic.to_string()));
    }
}
