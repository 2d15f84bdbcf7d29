use async_trait::async_trait;

use crate::types::{SearchHit, VectorRecord};
use crate::Result;

/// Nearest-neighbor vector storage over a single named collection.
///
/// Implementations hold one long-lived connection shared across concurrent
/// requests; no call carries request-scoped state.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if it does not exist yet. Idempotent, keyed by
    /// collection name and vector dimension.
    async fn ensure_collection(&self) -> Result<()>;

    /// Insert or overwrite records by id.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()>;

    /// Return up to `limit` records nearest to `vector` by cosine similarity,
    /// best first, payload included, vectors omitted.
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>>;
}
