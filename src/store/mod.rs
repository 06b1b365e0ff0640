//! Document store access
//!
//! The store is PostgreSQL with the pgvector extension, treated as an opaque
//! service: this module only issues the scored hybrid query, a liveness
//! probe, and lifecycle calls. Table layout and indexing belong to the
//! ingestion side.
//!
//! Connections are plain `sqlx::PgConnection`s managed by the bounded
//! [`pool::ConnectionPool`] rather than a library pool, because leases must
//! follow the strict acquire-once/release-once discipline the orchestrator
//! depends on.

pub mod pool;

pub use pool::ConnectionPool;

use std::time::Duration;

use pgvector::Vector;
use sqlx::Connection;
use sqlx::PgConnection;
use tracing::debug;

use crate::errors::CorpusRagError;
use crate::errors::Result;
use crate::models::Candidate;

/// A single persistent handle to the document store
pub struct StoreConnection {
    conn: PgConnection,
    url: String,
    connect_timeout: Duration,
}

impl StoreConnection {
    /// Open a new connection to the store.
    ///
    /// Connect failures (including the timeout) surface as
    /// `StoreUnavailable`; they are not retried here.
    pub async fn connect(url: &str, connect_timeout: Duration) -> Result<Self> {
        let conn = tokio::time::timeout(connect_timeout, PgConnection::connect(url))
            .await
            .map_err(|_| {
                CorpusRagError::StoreUnavailable(format!(
                    "connection attempt timed out after {}s",
                    connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| CorpusRagError::StoreUnavailable(e.to_string()))?;

        Ok(Self {
            conn,
            url: url.to_string(),
            connect_timeout,
        })
    }

    /// Liveness probe
    pub async fn is_connected(&mut self) -> bool {
        self.conn.ping().await.is_ok()
    }

    /// Replace a dead connection with a fresh one to the same store
    pub async fn reconnect(&mut self) -> Result<()> {
        let fresh = Self::connect(&self.url, self.connect_timeout).await?;
        self.conn = fresh.conn;
        Ok(())
    }

    /// Close the connection, logging rather than propagating close errors
    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            debug!("Error closing store connection: {}", e);
        }
    }

    /// Run the scored hybrid query.
    ///
    /// With keywords the score blends full-text rank and vector similarity
    /// weighted by `hybrid_ratio`, and documents must match at least one
    /// keyword before they are scored. Without keywords the ranking is pure
    /// vector similarity. Results come back ordered by `hybrid_score`
    /// descending, at most `limit` rows.
    pub async fn hybrid_search(
        &mut self,
        embedding: Vec<f32>,
        keywords: Option<&str>,
        hybrid_ratio: f64,
        limit: i64,
    ) -> Result<Vec<Candidate>> {
        #[derive(sqlx::FromRow)]
        struct RawRow {
            id: i64,
            content: String,
            metadata: Option<serde_json::Value>,
            hybrid_score: f64,
        }

        let embedding = Vector::from(embedding);

        let rows: Vec<RawRow> = if let Some(keywords) = keywords {
            sqlx::query_as::<_, RawRow>(
                r"
                SELECT id, content, metadata,
                    (ts_rank(to_tsvector('english', content), to_tsquery('english', $1)) * $2
                     + (1 - (embedding <=> $3)) * $4)::float8 AS hybrid_score
                FROM documents
                WHERE to_tsvector('english', content) @@ to_tsquery('english', $1)
                ORDER BY hybrid_score DESC
                LIMIT $5
                ",
            )
            .bind(keywords)
            .bind(1.0 - hybrid_ratio)
            .bind(&embedding)
            .bind(hybrid_ratio)
            .bind(limit)
            .fetch_all(&mut self.conn)
            .await?
        } else {
            sqlx::query_as::<_, RawRow>(
                r"
                SELECT id, content, metadata,
                    ((1 - (embedding <=> $1)) * $2)::float8 AS hybrid_score
                FROM documents
                ORDER BY hybrid_score DESC
                LIMIT $3
                ",
            )
            .bind(&embedding)
            .bind(1.0_f64)
            .bind(limit)
            .fetch_all(&mut self.conn)
            .await?
        };

        Ok(rows
            .into_iter()
            .map(|r| Candidate {
                id: r.id,
                content: r.content,
                metadata: r.metadata.unwrap_or(serde_json::Value::Null),
                hybrid_score: r.hybrid_score,
                // Re-ranking overwrites this; until then the store order holds
                final_score: r.hybrid_score,
            })
            .collect())
    }

    /// Total number of documents in the corpus
    pub async fn document_count(&mut self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents")
            .fetch_one(&mut self.conn)
            .await?;
        Ok(row.0)
    }
}
