use async_trait::async_trait;

use crate::Result;

/// Keyed string storage backing session state.
///
/// An absent key is a valid state, not an error; callers decide whether it
/// means "empty" or "invalid". `keys` takes a `*`-wildcard glob in the Redis
/// KEYS style and exists only for maintenance sweeps, never the request path.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}
