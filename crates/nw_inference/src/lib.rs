pub mod models;

pub use models::gemini::GeminiCompletion;
pub use models::mock::{MockCompletion, MockEmbeddings};
pub use models::openai::OpenAiEmbeddings;

pub mod prelude {
    pub use super::{GeminiCompletion, MockCompletion, MockEmbeddings, OpenAiEmbeddings};
    pub use nw_core::{CompletionModel, EmbeddingProvider, Error, Result};
}
