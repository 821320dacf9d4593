//! Canonical binary serialization
//!
//! Contract state and transactions cross the host boundary as opaque blobs.
//! bincode gives a compact, deterministic encoding for the same value on every
//! replica, which instruction digests and derived instance ids rely on.

use crate::hash::{self, Hash32};
use crate::{MedchainError, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Serialize any serde-compatible value to canonical bytes
pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value)
        .map_err(|e| MedchainError::serialization(format!("Failed to encode value: {e}")))
}

/// Deserialize canonical bytes into any serde-compatible value
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes)
        .map_err(|e| MedchainError::serialization(format!("Failed to decode value: {e}")))
}

/// Serialize canonically and return the hash of the encoding
pub fn hash_canonical<T: Serialize>(value: &T) -> Result<Hash32> {
    let bytes = to_vec(value)?;
    Ok(hash::hash(&bytes))
}
