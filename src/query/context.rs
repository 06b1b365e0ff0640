//! Generation context assembly from retrieved candidates

use crate::models::Candidate;
use crate::models::SourceInfo;

/// Builds the passage context handed to generation.
///
/// Each passage is truncated to a character budget so a handful of long
/// documents cannot blow up the prompt; candidate metadata is never
/// touched here.
pub struct ContextAssembler {
    max_passage_chars: usize,
}

impl ContextAssembler {
    pub const fn new(max_passage_chars: usize) -> Self {
        Self { max_passage_chars }
    }

    /// Concatenate the candidate passages in rank order
    #[must_use]
    pub fn assemble(&self, candidates: &[Candidate]) -> String {
        let mut context = String::new();

        for (idx, candidate) in candidates.iter().enumerate() {
            if idx > 0 {
                context.push_str("\n\n");
            }
            context.push_str(&truncate_chars(&candidate.content, self.max_passage_chars));
        }

        context
    }
}

/// One source summary per candidate, rank order preserved, no dedup
pub fn sources(candidates: &[Candidate]) -> Vec<SourceInfo> {
    candidates
        .iter()
        .map(|candidate| SourceInfo::from_metadata(&candidate.metadata))
        .collect()
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn candidate(content: &str, metadata: serde_json::Value) -> Candidate {
        Candidate {
            id: 1,
            content: content.to_string(),
            metadata,
            hybrid_score: 0.5,
            final_score: 0.5,
        }
    }

    #[test]
    fn test_assemble_joins_passages() {
        let assembler = ContextAssembler::new(100);
        let context = assembler.assemble(&[
            candidate("First passage.", json!({})),
            candidate("Second passage.", json!({})),
        ]);
        assert_eq!(context, "First passage.\n\nSecond passage.");
    }

    #[test]
    fn test_assemble_truncates_long_passages() {
        let assembler = ContextAssembler::new(10);
        let context = assembler.assemble(&[candidate("a very long passage indeed", json!({}))]);
        assert_eq!(context, "a very lon...");
    }

    #[test]
    fn test_empty_candidates_yield_empty_context() {
        let assembler = ContextAssembler::new(100);
        assert_eq!(assembler.assemble(&[]), "");
    }

    #[test]
    fn test_sources_preserve_order_without_dedup() {
        let list = sources(&[
            candidate("x", json!({"heading": "A", "source": "one.md"})),
            candidate("y", json!({"heading": "B", "source": "one.md"})),
            candidate("z", json!({})),
        ]);

        assert_eq!(list.len(), 3);
        assert_eq!(list[0].heading, "A");
        assert_eq!(list[1].heading, "B");
        // Repeated sources stay; unknown metadata degrades to defaults
        assert_eq!(list[1].source, "one.md");
        assert_eq!(list[2].heading, "Unknown Title");
        assert_eq!(list[2].source, "None");
    }
}
