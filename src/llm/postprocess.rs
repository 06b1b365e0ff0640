//! Answer post-processing

use std::sync::OnceLock;

use regex::Regex;

fn reasoning_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("reasoning pattern is valid"))
}

/// Remove `<think>...</think>` spans the model emits for its own reasoning.
///
/// The caller must never see these; the answer is trimmed after removal.
pub fn strip_reasoning(answer: &str) -> String {
    reasoning_pattern().replace_all(answer, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_single_span() {
        let answer = "<think>the user wants the schedule</think>\nThe council meets Monday.";
        assert_eq!(strip_reasoning(answer), "The council meets Monday.");
    }

    #[test]
    fn test_strips_multiline_span() {
        let answer = "<think>\nline one\nline two\n</think>\n\nAnswer text.";
        assert_eq!(strip_reasoning(answer), "Answer text.");
    }

    #[test]
    fn test_strips_multiple_spans() {
        let answer = "<think>a</think>First.<think>b</think> Second.";
        assert_eq!(strip_reasoning(answer), "First. Second.");
    }

    #[test]
    fn test_leaves_plain_answers_alone() {
        assert_eq!(strip_reasoning("Just an answer."), "Just an answer.");
        assert_eq!(strip_reasoning("  padded  "), "padded");
    }

    #[test]
    fn test_unpaired_marker_is_kept() {
        // Without a closing marker there is no span to remove
        let answer = "<think>never closed";
        assert_eq!(strip_reasoning(answer), "<think>never closed");
    }
}
