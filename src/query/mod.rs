//! Query orchestration
//!
//! One [`QueryService::process`] call per incoming query:
//! detect language -> translate if needed -> lease a store connection ->
//! (retrieval in parallel with prompt preparation) -> assemble context ->
//! generate -> strip reasoning spans -> release the lease.
//!
//! The caller always receives a structured [`QueryOutcome`]; failures in
//! any stage surface as an error payload, never as a raw fault, and the
//! leased connection goes back to the pool on every path.
//!
//! # Examples
//!
//! ```rust,no_run
//! use corpusrag::config::AppConfig;
//! use corpusrag::query::QueryService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = QueryService::new(&config)?;
//!
//!     let outcome = service.process("Tell me about City Council").await;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod language;

pub use context::ContextAssembler;
pub use language::detect_language;

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::config::RetrievalConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::CorpusRagError;
use crate::errors::Result;
use crate::llm::inference_from_config;
use crate::llm::prompts;
use crate::llm::strip_reasoning;
use crate::llm::GenerationRequest;
use crate::llm::Inference;
use crate::llm::PreparedPrompt;
use crate::models::Candidate;
use crate::models::Query;
use crate::models::QueryLanguage;
use crate::models::QueryOutcome;
use crate::models::QueryResponse;
use crate::models::SourceInfo;
use crate::retrieval::HybridRetriever;
use crate::store::ConnectionPool;
use crate::store::StoreConnection;

/// Top-level coordinator for answering corpus questions
pub struct QueryService {
    pool: Arc<ConnectionPool>,
    retriever: HybridRetriever,
    inference: Arc<dyn Inference>,
    assembler: ContextAssembler,
    /// Caps simultaneous blocking store/inference calls across all requests
    workers: Arc<Semaphore>,
    retrieval: RetrievalConfig,
}

impl QueryService {
    /// Assemble the service from application config
    pub fn new(config: &AppConfig) -> Result<Self> {
        let pool = Arc::new(ConnectionPool::new(config));
        let embeddings = Arc::new(EmbeddingService::new(config)?);
        let retriever = HybridRetriever::new(embeddings, config.retrieval.clone());
        let inference = inference_from_config(&config.llm)?;
        let workers = Arc::new(Semaphore::new(config.workers.max_blocking_tasks));

        Ok(Self {
            pool,
            retriever,
            inference,
            assembler: ContextAssembler::new(config.retrieval.max_passage_chars),
            workers,
            retrieval: config.retrieval.clone(),
        })
    }

    /// Create from existing services
    pub fn from_services(
        pool: Arc<ConnectionPool>,
        retriever: HybridRetriever,
        inference: Arc<dyn Inference>,
        config: &AppConfig,
    ) -> Self {
        Self {
            pool,
            retriever,
            inference,
            assembler: ContextAssembler::new(config.retrieval.max_passage_chars),
            workers: Arc::new(Semaphore::new(config.workers.max_blocking_tasks)),
            retrieval: config.retrieval.clone(),
        }
    }

    /// Answer one query.
    ///
    /// Never returns an error across this boundary: any failure becomes
    /// an `{error}` payload.
    pub async fn process(&self, raw_query: &str) -> QueryOutcome {
        info!("Processing query: {}", raw_query);

        match self.run(raw_query).await {
            Ok(response) => QueryOutcome::Answer(response),
            Err(e) => {
                warn!("Query failed: {}", e);
                QueryOutcome::error(e.to_string())
            }
        }
    }

    async fn run(&self, raw_query: &str) -> Result<QueryResponse> {
        let language = detect_language(raw_query);
        debug!(language = language.label(), "Detected query language");

        let search_text = if language.needs_translation() {
            let translation = self.inference.translate(raw_query).await?;
            debug!("Translated query: {}", translation);
            translation
        } else {
            raw_query.to_string()
        };

        let query = Query {
            raw_text: raw_query.to_string(),
            language,
            search_text,
        };

        let mut conn = self.pool.lease().await?;
        // Whatever happens below, the lease goes back exactly once.
        let result = self.answer(&mut conn, &query).await;
        self.pool.release(conn).await;

        let (answer, sources) = result?;
        info!("Query completed with {} sources", sources.len());

        Ok(QueryResponse {
            answer,
            sources,
            language_info: (query.language.label().to_string(), query.search_text),
        })
    }

    /// Retrieval through generation, with the fork/join in the middle
    async fn answer(
        &self,
        conn: &mut StoreConnection,
        query: &Query,
    ) -> Result<(String, Vec<SourceInfo>)> {
        let current_date = chrono::Local::now().format("%A, %B %d, %Y").to_string();

        // Retrieval and prompt preparation have no data dependency.
        let (candidates, prepared) = tokio::join!(
            self.retrieve(conn, &query.search_text),
            prepare_prompt(query.language, current_date),
        );
        let candidates = candidates?;
        debug!("Retrieved {} candidates", candidates.len());

        let context = self.assembler.assemble(&candidates);
        let sources = context::sources(&candidates);

        let request = GenerationRequest {
            prompt: prepared,
            context,
            query: query.search_text.clone(),
        };

        let answer = {
            let _permit = self
                .workers
                .acquire()
                .await
                .map_err(|_| CorpusRagError::WorkerPoolClosed)?;
            self.inference.generate(&request).await?
        };

        Ok((strip_reasoning(&answer), sources))
    }

    async fn retrieve(
        &self,
        conn: &mut StoreConnection,
        search_text: &str,
    ) -> Result<Vec<Candidate>> {
        let _permit = self
            .workers
            .acquire()
            .await
            .map_err(|_| CorpusRagError::WorkerPoolClosed)?;
        self.retriever
            .search(conn, search_text, self.retrieval.top_k, self.retrieval.hybrid_ratio)
            .await
    }

    /// Connection pool shared with concurrent requests
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }
}

/// Build the language/date portion of the prompt while retrieval runs
async fn prepare_prompt(language: QueryLanguage, current_date: String) -> PreparedPrompt {
    PreparedPrompt::new(prompts::answer_template(language)).set("current_date", current_date)
}
