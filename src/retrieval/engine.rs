//! Hybrid retrieval engine

use std::sync::Arc;

use tracing::debug;

use crate::config::RetrievalConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::models::Candidate;
use crate::retrieval::extract_keywords;
use crate::retrieval::rerank;
use crate::retrieval::tsquery_disjunction;
use crate::store::StoreConnection;

/// Two-stage retriever: store-side hybrid scoring, then in-process re-rank
pub struct HybridRetriever {
    embeddings: Arc<EmbeddingService>,
    config: RetrievalConfig,
}

impl HybridRetriever {
    pub fn new(embeddings: Arc<EmbeddingService>, config: RetrievalConfig) -> Self {
        Self { embeddings, config }
    }

    /// Produce at most `k` candidates ordered by descending final score.
    ///
    /// `hybrid_ratio` balances keyword rank against vector similarity
    /// (0.0 = all keyword, 1.0 = all vector). Queries with no extractable
    /// keywords collapse to pure vector ranking.
    pub async fn search(
        &self,
        conn: &mut StoreConnection,
        query: &str,
        k: usize,
        hybrid_ratio: f64,
    ) -> Result<Vec<Candidate>> {
        debug!("Hybrid search: {}", query);

        let embedding = self.embeddings.generate(query).await?;

        let keywords = extract_keywords(query);
        let disjunction = if keywords.is_empty() {
            debug!("No keywords extracted, using pure vector ranking");
            None
        } else {
            Some(tsquery_disjunction(&keywords))
        };

        // The candidate window gives the re-rank stage enough material
        // without scanning the whole corpus.
        let window = (k * self.config.candidate_multiplier) as i64;
        let candidates = conn
            .hybrid_search(embedding, disjunction.as_deref(), hybrid_ratio, window)
            .await?;
        debug!("First stage returned {} candidates", candidates.len());

        let mut ranked = rerank(query, &keywords, candidates, &self.config);
        ranked.truncate(k);
        Ok(ranked)
    }

    /// Retrieval tuning currently in effect
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }
}
