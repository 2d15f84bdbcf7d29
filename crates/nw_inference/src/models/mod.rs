pub mod gemini;
pub mod mock;
pub mod openai;

pub use gemini::GeminiCompletion;
pub use mock::{MockCompletion, MockEmbeddings};
pub use openai::OpenAiEmbeddings;
