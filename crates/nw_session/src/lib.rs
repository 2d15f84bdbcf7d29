use std::sync::Arc;

use nw_core::{ConversationStore, Result};

pub mod backends;
pub mod manager;

pub use backends::memory::MemoryConversationStore;
pub use manager::SessionManager;

/// Construct a conversation store by backend name. `memory` is always
/// available; `redis` requires the feature of the same name.
pub async fn create_conversation_store(
    backend: &str,
    url: &str,
) -> Result<Arc<dyn ConversationStore>> {
    tracing::debug!("Creating {} conversation store ({})", backend, url);
    match backend {
        "memory" => Ok(Arc::new(MemoryConversationStore::new())),
        #[cfg(feature = "redis")]
        "redis" => Ok(Arc::new(
            backends::redis::RedisConversationStore::connect(url).await?,
        )),
        other => Err(nw_core::Error::Storage(format!(
            "Unknown session backend: {}",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::{MemoryConversationStore, SessionManager};
    pub use nw_core::{ConversationStore, Message, Result, Role};
}
