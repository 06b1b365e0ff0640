//! Embeddings generation module
//!
//! Wraps the embedding backend behind a small service so the retrieval engine
//! never talks HTTP directly. Supported providers:
//! - Ollama (local models, e.g. bge-m3)
//! - OpenAI-compatible endpoints
//!
//! # Examples
//!
//! ```rust,no_run
//! use corpusrag::embeddings::EmbeddingService;
//! use corpusrag::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;

use crate::errors::CorpusRagError;
use crate::errors::Result;

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        let endpoint = config.embedding_endpoint().to_string();
        // OpenAI-style endpoints require a key; anything else is assumed to
        // speak the Ollama API.
        let provider = if endpoint.contains("api.openai.com") {
            EmbeddingProvider::OpenAI
        } else {
            EmbeddingProvider::Ollama
        };

        Self {
            provider,
            model: config.embedding_model().to_string(),
            dimension: config.embedding_dimension(),
            endpoint,
            api_key: config.embeddings.api_key.clone(),
        }
    }
}

/// Service for generating query embeddings
pub struct EmbeddingService {
    client: EmbeddingClient,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service from application config
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::from_config(EmbeddingConfig::from_app_config(config))
    }

    /// Create from custom config
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?;

        Ok(Self { client, config })
    }

    /// Generate an embedding for a single text.
    ///
    /// The backend model is expected to return unit-length vectors; the
    /// dimension is checked here so a misconfigured model fails loudly
    /// instead of corrupting store queries.
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.client.generate(text).await?;

        if embedding.len() != self.config.dimension {
            return Err(CorpusRagError::Embedding(format!(
                "expected {} dimensions from model {}, got {}",
                self.config.dimension,
                self.config.model,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    /// Configured embedding dimension
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }
}
