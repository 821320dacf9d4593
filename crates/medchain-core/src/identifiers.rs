//! Identifiers used by the ledger and the host runtime
//!
//! Both types are opaque to the contract: instance ids are derived by the
//! host, darc ids are resolved by the host and only carried forward.

use crate::hash::{self, Hash32};
use crate::{MedchainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Contract identifier under which query instances are stored
pub const QUERY_CONTRACT_ID: &str = "queryContract";

/// Identifier of a ledger instance (32 bytes, hex in text form)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub Hash32);

impl InstanceId {
    /// Create from raw bytes
    pub const fn new(bytes: Hash32) -> Self {
        Self(bytes)
    }

    /// Derive an instance id from a seed and a label.
    ///
    /// Every replica computes the same id for the same inputs.
    pub fn derive(seed: &[u8], label: &str) -> Self {
        Self(hash::hash_chunks(&[seed, label.as_bytes()]))
    }

    /// Get the raw bytes
    pub const fn as_bytes(&self) -> &Hash32 {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for InstanceId {
    type Err = MedchainError;

    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| MedchainError::invalid(format!("Invalid instance id {s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl From<Hash32> for InstanceId {
    fn from(bytes: Hash32) -> Self {
        Self(bytes)
    }
}

/// Ownership token (darc id) attached to every stored instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DarcId(pub Vec<u8>);

impl DarcId {
    /// Create from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for DarcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "darc:{}", hex::encode(&self.0))
    }
}
