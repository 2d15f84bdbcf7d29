pub mod memory;

#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryConversationStore;

#[cfg(feature = "redis")]
pub use redis::RedisConversationStore;
