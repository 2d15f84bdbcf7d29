use std::fmt;

use async_trait::async_trait;
use nw_core::{CompletionModel, EmbeddingProvider, Result};

/// Deterministic offline embeddings: text length plus character frequencies.
/// Similar texts land near each other, which is all tests need.
pub struct MockEmbeddings {
    dimension: usize,
}

impl MockEmbeddings {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl fmt::Debug for MockEmbeddings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockEmbeddings")
            .field("dimension", &self.dimension)
            .finish()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddings {
    fn name(&self) -> &str {
        "Mock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0; self.dimension];
        let text_len = text.len().max(1) as f32;
        embedding[0] = text_len / 1000.0;

        // Bucket character frequencies into the remaining positions.
        for c in text.chars() {
            let slot = 1 + (c as usize) % (self.dimension - 1);
            embedding[slot] += 1.0 / text_len;
        }

        Ok(embedding)
    }
}

/// Completion stub returning a fixed answer regardless of prompt.
#[derive(Debug, Clone)]
pub struct MockCompletion {
    answer: String,
}

impl MockCompletion {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

#[async_trait]
impl CompletionModel for MockCompletion {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.answer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedding_is_deterministic() {
        let provider = MockEmbeddings::new(64);
        let a = provider.embed("elections in the spring").await.unwrap();
        let b = provider.embed("elections in the spring").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn test_mock_completion_returns_canned_answer() {
        let model = MockCompletion::new("Here is the answer [1].");
        let answer = model.complete("anything").await.unwrap();
        assert_eq!(answer, "Here is the answer [1].");
    }
}
