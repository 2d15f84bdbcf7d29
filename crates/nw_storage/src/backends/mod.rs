pub mod memory;

#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use memory::MemoryVectorStore;

#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
