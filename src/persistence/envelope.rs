//! Versioned JSON envelope for persisted documents

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::StorageError;

/// Current envelope version
pub const CURRENT_VERSION: u32 = 1;

/// `{ "version": n, "payload": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            version: CURRENT_VERSION,
            payload,
        }
    }

    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode a stored document.
    ///
    /// Accepts the current envelope and a bare payload written before envelopes
    /// existed. Newer versions are refused rather than guessed at.
    pub fn decode(json: &str) -> Result<T, StorageError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let versioned = value
            .as_object()
            .is_some_and(|obj| obj.contains_key("version") && obj.contains_key("payload"));

        if !versioned {
            return Ok(serde_json::from_value(value)?);
        }

        let envelope: Envelope<T> = serde_json::from_value(value)?;
        if envelope.version > CURRENT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: envelope.version,
                supported: CURRENT_VERSION,
            });
        }
        Ok(envelope.payload)
    }
}
