//! HTTP client for the language-model inference service

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::LlmConfig;
use crate::errors::CorpusRagError;
use crate::errors::Result;

/// Client for a single inference endpoint (Ollama-style `/api/generate`)
pub struct InferenceClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    top_p: f32,
}

impl InferenceClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CorpusRagError::Http(e.to_string()))?;

        // "ollama" is the conventional placeholder key for local endpoints
        let api_key = match config.llm_key.as_str() {
            "" | "ollama" => None,
            key => Some(key.to_string()),
        };

        Ok(Self {
            client,
            endpoint: config.llm_endpoint.clone(),
            model: config.llm_model.clone(),
            api_key,
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    /// Run one completion and return the model's full response text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: GenerateOptions,
        }

        #[derive(Serialize)]
        struct GenerateOptions {
            temperature: f32,
            top_p: f32,
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            response: String,
        }

        let url = format!("{}/api/generate", self.endpoint);
        debug!(model = %self.model, "Calling inference API: {}", url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                top_p: self.top_p,
            },
        };

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| CorpusRagError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CorpusRagError::Inference(format!(
                "Inference API error ({status}): {error_text}"
            )));
        }

        let result: GenerateResponse = response.json().await.map_err(|e| {
            CorpusRagError::Inference(format!("Failed to parse response: {e}"))
        })?;

        Ok(result.response)
    }
}
