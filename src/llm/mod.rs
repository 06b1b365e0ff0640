//! Inference client management
//!
//! Translation and answer generation go through the [`Inference`] trait so
//! the instance policy is decided once at startup:
//! - [`provider::PerWorkerInference`] builds an isolated client per
//!   invocation (no shared mutable state, no lock);
//! - [`provider::SharedInference`] holds one client and bounds concurrent
//!   calls with a semaphore.
//!
//! Use the first unless the backend is known to handle concurrent requests.

pub mod client;
pub mod postprocess;
pub mod prompts;
pub mod provider;

pub use client::InferenceClient;
pub use postprocess::strip_reasoning;
pub use prompts::PreparedPrompt;
pub use prompts::PromptTemplate;
pub use provider::inference_from_config;
pub use provider::Inference;

/// Everything generation needs, assembled after the retrieval join
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Language-specific template, already carrying the current date
    pub prompt: PreparedPrompt,
    /// Concatenated retrieved passages
    pub context: String,
    /// The search text (translated form for secondary-language queries)
    pub query: String,
}

impl GenerationRequest {
    /// Render the final prompt sent to the model
    pub fn render(&self) -> String {
        self.prompt.complete(&self.context, &self.query)
    }
}
