pub mod conversation;
pub mod error;
pub mod inference;
pub mod types;
pub mod vector;

pub use conversation::ConversationStore;
pub use error::Error;
pub use inference::{CompletionModel, EmbeddingProvider};
pub use types::{
    Article, CitedArticle, EmbeddedArticle, EmbeddedChunk, Message, RecordPayload,
    RetrievalResult, Role, SearchHit, VectorRecord,
};
pub use vector::VectorStore;

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{Article, CitedArticle, Error, Message, Result, Role};
}
