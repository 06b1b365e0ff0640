//! Client-side re-ranking of store candidates

use crate::config::RetrievalConfig;
use crate::models::Candidate;

/// Apply the heuristic scoring pass and sort by `final_score` descending.
///
/// For each candidate:
/// - exact-phrase bonus: `exact_match_bonus` when the lowercased query
///   appears verbatim in the content, else 1.0;
/// - keyword density: fraction of the query keywords present in the
///   content, 0 when there are no keywords;
/// - `final_score = hybrid_score * bonus * (1 + density * keyword_density_weight)`.
///
/// The sort is stable, so candidates with equal final scores keep their
/// store-side relative order.
pub fn rerank(
    query: &str,
    keywords: &[String],
    mut candidates: Vec<Candidate>,
    config: &RetrievalConfig,
) -> Vec<Candidate> {
    let query_lower = query.to_lowercase();

    for candidate in &mut candidates {
        let content = candidate.content.to_lowercase();

        let exact_match_bonus = if content.contains(&query_lower) {
            config.exact_match_bonus
        } else {
            1.0
        };

        let keyword_density = if keywords.is_empty() {
            0.0
        } else {
            let matched = keywords
                .iter()
                .filter(|keyword| content.contains(keyword.as_str()))
                .count();
            matched as f64 / keywords.len() as f64
        };

        candidate.final_score = candidate.hybrid_score
            * exact_match_bonus
            * (1.0 + keyword_density * config.keyword_density_weight);
    }

    candidates.sort_by(|a, b| b.final_score.partial_cmp(&a.final_score).unwrap());
    candidates
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::retrieval::extract_keywords;

    fn candidate(id: i64, content: &str, hybrid_score: f64) -> Candidate {
        Candidate {
            id,
            content: content.to_string(),
            metadata: json!({}),
            hybrid_score,
            final_score: hybrid_score,
        }
    }

    #[test]
    fn test_exact_phrase_bonus() {
        let query = "city council";
        let keywords = extract_keywords(query);
        let config = RetrievalConfig::default();

        let results = rerank(
            query,
            &keywords,
            vec![
                candidate(1, "The City Council meets on the first Monday.", 0.6),
                candidate(2, "The council schedule for the city is posted.", 0.6),
            ],
            &config,
        );

        // Both candidates contain both keywords; only the first has the
        // verbatim phrase, so it must outrank the other by the bonus alone.
        assert_eq!(results[0].id, 1);
        assert!(results[0].final_score > results[0].hybrid_score);
        assert!(results[0].final_score > results[1].final_score);
        let expected = 0.6 * 1.5 * (1.0 + 1.0 * 0.5);
        assert!((results[0].final_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_density_scales_score() {
        let query = "Tell me about City Council";
        let keywords = extract_keywords(query);
        let config = RetrievalConfig::default();

        let results = rerank(
            query,
            &keywords,
            vec![
                candidate(1, "City Council meets on the first Monday", 0.5),
                candidate(2, "The city budget was approved", 0.5),
            ],
            &config,
        );

        // keywords: tell, about, city, council -> densities 0.5 vs 0.25
        assert_eq!(results[0].id, 1);
        assert!((results[0].final_score - 0.5 * (1.0 + 0.5 * 0.5)).abs() < 1e-9);
        assert!((results[1].final_score - 0.5 * (1.0 + 0.25 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_no_keywords_means_no_density_bonus() {
        let query = "is it on";
        let keywords = extract_keywords(query);
        assert!(keywords.is_empty());

        let results = rerank(
            query,
            &keywords,
            vec![candidate(1, "Completely unrelated content", 0.8)],
            &RetrievalConfig::default(),
        );

        assert!((results[0].final_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_store_order() {
        let query = "zoning";
        let keywords = extract_keywords(query);

        let results = rerank(
            query,
            &keywords,
            vec![
                candidate(10, "no match here", 0.4),
                candidate(11, "nothing relevant either", 0.4),
                candidate(12, "still nothing", 0.4),
            ],
            &RetrievalConfig::default(),
        );

        let ids: Vec<i64> = results.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn test_sorted_descending() {
        let query = "city council meeting";
        let keywords = extract_keywords(query);

        let results = rerank(
            query,
            &keywords,
            vec![
                candidate(1, "irrelevant", 0.9),
                candidate(2, "city council meeting minutes", 0.5),
                candidate(3, "the city published a notice", 0.7),
            ],
            &RetrievalConfig::default(),
        );

        for pair in results.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
    }

    #[test]
    fn test_city_council_scenario() {
        // A document mentioning both keywords gets a density bonus and
        // lands in the top results even from a mid-window position.
        let query = "Tell me about City Council";
        let keywords = extract_keywords(query);
        let config = RetrievalConfig::default();

        let mut candidates = vec![
            candidate(1, "Parking permits are renewed in January.", 0.62),
            candidate(2, "Budget hearings conclude next week.", 0.61),
            candidate(3, "City Council meets on the first Monday", 0.60),
            candidate(4, "Leaf collection runs through November.", 0.59),
        ];
        candidates[2].metadata = json!({"heading": "Meeting Schedule"});

        let results = rerank(query, &keywords, candidates, &config);
        let top3: Vec<i64> = results.iter().take(3).map(|c| c.id).collect();
        assert!(top3.contains(&3));
        let schedule = results.iter().find(|c| c.id == 3).unwrap();
        assert!(schedule.final_score > schedule.hybrid_score);
    }
}
