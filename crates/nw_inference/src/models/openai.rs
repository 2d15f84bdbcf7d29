use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nw_core::{EmbeddingProvider, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const EMBEDDING_DIMENSION: usize = 1536;

#[derive(Serialize)]
struct EmbeddingRequest {
    input: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI embeddings client. The credential is checked on first use, not at
/// construction, so a server without ingestion traffic can boot without one.
pub struct OpenAiEmbeddings {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiEmbeddings {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("OPENAI_API_KEY").ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for OpenAiEmbeddings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiEmbeddings")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            nw_core::Error::Config("OPENAI_API_KEY environment variable is not set".to_string())
        })?;

        let request = EmbeddingRequest {
            input: text.to_string(),
            model: EMBEDDING_MODEL.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<EmbeddingResponse>()
            .await?;

        let data = response.data.into_iter().next().ok_or_else(|| {
            nw_core::Error::Upstream("Embedding response contained no data".to_string())
        })?;

        Ok(data.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_on_first_call() {
        let provider = OpenAiEmbeddings::new(None);
        let result = provider.embed("some text").await;
        assert!(matches!(result, Err(nw_core::Error::Config(_))));
    }

    #[test]
    fn test_dimension_matches_reference_deployment() {
        let provider = OpenAiEmbeddings::new(Some("test-key".to_string()));
        assert_eq!(provider.dimension(), 1536);
    }
}
