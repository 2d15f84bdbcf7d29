use async_trait::async_trait;
use nw_core::{ConversationStore, Result};
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::info;

fn storage_err(e: redis::RedisError) -> nw_core::Error {
    nw_core::Error::Storage(format!("Redis error: {}", e))
}

/// Redis-backed conversation store. The connection manager reconnects on its
/// own and is cheap to clone per call.
pub struct RedisConversationStore {
    conn: ConnectionManager,
}

impl RedisConversationStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(storage_err)?;
        let conn = client.get_connection_manager().await.map_err(storage_err)?;
        info!("Redis client connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(storage_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(storage_err)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(key).await.map_err(storage_err)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(storage_err)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.keys::<_, Vec<String>>(pattern)
            .await
            .map_err(storage_err)
    }
}
