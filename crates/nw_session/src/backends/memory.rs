use std::collections::HashMap;

use async_trait::async_trait;
use nw_core::{ConversationStore, Result};
use tokio::sync::RwLock;

/// In-process conversation store. Matches the store contract including its
/// weakness: `set` is a whole-value write, so interleaved read-modify-write
/// sequences are last-writer-wins.
pub struct MemoryConversationStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Glob match supporting a single `*` wildcard, the only shape the session
/// sweep uses (`session:*:createdAt`).
fn matches_pattern(pattern: &str, key: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            key.len() >= prefix.len() + suffix.len()
                && key.starts_with(prefix)
                && key.ends_with(suffix)
        }
        None => pattern == key,
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|key| matches_pattern(pattern, key))
            .cloned()
            .collect())
    }
}
