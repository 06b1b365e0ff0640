//! Hybrid retrieval module
//!
//! Two-stage ranking over the document store:
//! 1. A single store-side query blends full-text keyword rank with vector
//!    similarity into a `hybrid_score`, pre-filtered to documents matching
//!    at least one keyword, limited to a candidate window of `5 * k`.
//! 2. An in-process re-rank applies an exact-phrase bonus and a keyword
//!    density bonus, then truncates to `k`.
//!
//! The heuristic multipliers are meant to reorder a small candidate window,
//! not to replace the store-side ranking; ties keep store order.

pub mod engine;
pub mod keywords;
pub mod rerank;

pub use engine::HybridRetriever;
pub use keywords::extract_keywords;
pub use keywords::tsquery_disjunction;
pub use rerank::rerank;
