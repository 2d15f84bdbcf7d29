use async_trait::async_trait;

use crate::Result;

/// Turns text into a fixed-length vector. Ingestion and retrieval must share
/// one provider so query and article vectors live in the same space.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Length of every vector this provider produces.
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Single-shot text completion against a language model.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}
