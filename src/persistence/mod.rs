//! Durable storage for the configuration and the alert state
//!
//! Backends store opaque bytes under a key. The coordinator is the only
//! writer and serializes every save.

pub mod coordinator;
pub mod file;
pub mod memory;

pub use coordinator::{PersistenceCoordinator, ALERT_STATE_KEY, CONFIG_KEY};
pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Byte store addressed by key; the coordinator decides what goes in it
pub trait PersistenceBackend: Send + Sync {
    /// Store `data` as the whole new content of `key`
    fn write(&self, key: &str, data: &[u8]) -> Result<(), PersistenceError>;

    /// Content of `key`, `None` if nothing was stored yet
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode {key}: {reason}")]
    Encode { key: String, reason: String },

    #[error("Failed to decode {key}: {reason}")]
    Decode { key: String, reason: String },
}
