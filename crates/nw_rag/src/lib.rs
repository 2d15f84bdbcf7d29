pub mod ingest;
pub mod retriever;
pub mod service;
pub mod snapshot;
pub mod synthesis;

pub use ingest::IngestionPipeline;
pub use retriever::Retriever;
pub use service::{ChatOutcome, ChatService};
pub use snapshot::ArticleSnapshot;
pub use synthesis::AnswerSynthesizer;

pub mod prelude {
    pub use super::{
        AnswerSynthesizer, ArticleSnapshot, ChatOutcome, ChatService, IngestionPipeline,
        Retriever,
    };
    pub use nw_core::{Article, CitedArticle, Result, RetrievalResult};
}
