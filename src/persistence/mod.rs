//! Save/load persistence
//!
//! Features:
//! - Key/value storage backends (memory, JSON files, browser LocalStorage)
//! - Versioned JSON envelope
//! - Atomic file writes (tmp → rename)
//! - Corruption detection (callers degrade to defaults)

pub mod envelope;
pub mod storage;

pub use envelope::Envelope;
pub use storage::{MemoryStorage, ScoreStorage, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
