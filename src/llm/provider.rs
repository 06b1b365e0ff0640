//! Instance policy for the inference client

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::client::InferenceClient;
use super::prompts;
use super::GenerationRequest;
use crate::config::LlmConfig;
use crate::errors::CorpusRagError;
use crate::errors::Result;

/// Translation and generation calls, independent of instance policy
#[async_trait]
pub trait Inference: Send + Sync {
    /// Translate Spanish text to English
    async fn translate(&self, text: &str) -> Result<String>;

    /// Generate an answer from retrieved context
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Builds an isolated client for every invocation.
///
/// Nothing is shared between concurrent requests, so no serialization is
/// needed; use this when the backend's concurrency behavior is unknown.
pub struct PerWorkerInference {
    config: LlmConfig,
}

impl PerWorkerInference {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Inference for PerWorkerInference {
    async fn translate(&self, text: &str) -> Result<String> {
        let client = InferenceClient::new(&self.config)?;
        let translation = client.complete(&prompts::translation_prompt(text)).await?;
        Ok(translation.trim().to_string())
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let client = InferenceClient::new(&self.config)?;
        client.complete(&request.render()).await
    }
}

/// One process-wide client with semaphore-bounded access.
///
/// Only valid when the backend handles concurrent invocation; the
/// semaphore caps in-flight calls at `max_concurrent_requests`.
pub struct SharedInference {
    client: InferenceClient,
    permits: Semaphore,
}

impl SharedInference {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: InferenceClient::new(config)?,
            permits: Semaphore::new(config.max_concurrent_requests),
        })
    }
}

#[async_trait]
impl Inference for SharedInference {
    async fn translate(&self, text: &str) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| CorpusRagError::WorkerPoolClosed)?;
        let translation = self
            .client
            .complete(&prompts::translation_prompt(text))
            .await?;
        Ok(translation.trim().to_string())
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| CorpusRagError::WorkerPoolClosed)?;
        self.client.complete(&request.render()).await
    }
}

/// Select the instance policy once at startup
pub fn inference_from_config(config: &LlmConfig) -> Result<Arc<dyn Inference>> {
    if config.shared_instance {
        Ok(Arc::new(SharedInference::new(config)?))
    } else {
        Ok(Arc::new(PerWorkerInference::new(config.clone())))
    }
}
