use std::sync::Arc;

use nw_core::{Result, VectorStore};

pub mod backends;

pub use backends::*;

/// Where a vector backend lives and how its collection is shaped.
#[derive(Debug, Clone)]
pub struct VectorBackendConfig {
    pub url: String,
    pub collection: String,
    pub dimension: usize,
}

pub const DEFAULT_COLLECTION: &str = "news_articles";
pub const DEFAULT_DIMENSION: usize = 1536;

impl Default for VectorBackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            collection: DEFAULT_COLLECTION.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }
}

/// Construct a vector store by backend name. `memory` is always available;
/// `qdrant` requires the feature of the same name.
pub async fn create_vector_store(
    backend: &str,
    config: VectorBackendConfig,
) -> Result<Arc<dyn VectorStore>> {
    match backend {
        "memory" => Ok(Arc::new(backends::memory::MemoryVectorStore::new(config))),
        #[cfg(feature = "qdrant")]
        "qdrant" => Ok(Arc::new(
            backends::qdrant::QdrantVectorStore::new(config).await?,
        )),
        other => Err(nw_core::Error::Storage(format!(
            "Unknown vector storage backend: {}",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::memory::MemoryVectorStore;
    pub use super::{VectorBackendConfig, DEFAULT_COLLECTION, DEFAULT_DIMENSION};
    pub use nw_core::{Result, SearchHit, VectorRecord, VectorStore};
}
