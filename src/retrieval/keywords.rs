//! Keyword extraction for the text-search stage

use std::sync::OnceLock;

use regex::Regex;

/// Words carrying no retrieval signal on their own
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "is", "are", "in", "on", "at", "to", "for", "with",
];

/// Tokens shorter than this are noise for full-text ranking
const MIN_TOKEN_CHARS: usize = 3;

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"))
}

/// Extract meaningful lowercase keywords from a query.
///
/// Returns an empty vector when the query consists entirely of stop words
/// and short tokens; callers treat that as "skip the keyword stage".
pub fn extract_keywords(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();

    word_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|word| {
            word.chars().count() >= MIN_TOKEN_CHARS && !STOP_WORDS.contains(&word.as_str())
        })
        .collect()
}

/// Format keywords as a PostgreSQL tsquery disjunction (`word1 | word2`)
pub fn tsquery_disjunction(keywords: &[String]) -> String {
    keywords.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_lowercased_terms() {
        let keywords = extract_keywords("Tell me about City Council");
        assert_eq!(keywords, vec!["tell", "about", "city", "council"]);
    }

    #[test]
    fn test_drops_stop_words_and_short_tokens() {
        let keywords = extract_keywords("Is the tax due on or at an IRS office?");
        assert_eq!(keywords, vec!["tax", "due", "irs", "office"]);
    }

    #[test]
    fn test_all_stop_words_yields_empty() {
        assert!(extract_keywords("is it in an or at").is_empty());
        assert!(extract_keywords("").is_empty());
    }

    #[test]
    fn test_punctuation_is_a_boundary() {
        let keywords = extract_keywords("opening-hours: monday,tuesday");
        assert_eq!(keywords, vec!["opening", "hours", "monday", "tuesday"]);
    }

    #[test]
    fn test_disjunction_format() {
        let keywords = vec!["city".to_string(), "council".to_string()];
        assert_eq!(tsquery_disjunction(&keywords), "city | council");

        let single = vec!["council".to_string()];
        assert_eq!(tsquery_disjunction(&single), "council");
    }
}
