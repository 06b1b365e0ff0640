//! corpusrag: hybrid retrieval and query orchestration over a scraped
//! document corpus
//!
//! The crate answers natural-language questions against documents stored in
//! PostgreSQL + pgvector:
//! - two-stage hybrid ranking (store-side keyword/vector blend, in-process
//!   heuristic re-rank);
//! - per-request orchestration of language detection, translation,
//!   retrieval, and generation under bounded concurrency;
//! - a bounded pool of reusable store connections with strict
//!   lease/release discipline.
//!
//! Ingestion, crawling, and the outward request surface live elsewhere;
//! this crate treats the store, the embedding model, and the inference
//! service as external collaborators.

pub mod config;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod query;
pub mod retrieval;
pub mod store;

pub use config::AppConfig;
pub use errors::*;
pub use models::QueryOutcome;
pub use models::QueryResponse;
pub use query::QueryService;
