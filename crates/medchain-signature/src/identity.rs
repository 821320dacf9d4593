//! Signer identities
//!
//! An identity is the textual form of an Ed25519 public key,
//! `ed25519:<64 hex chars>`. Rosters are keyed by this string, so the same
//! key must always render to the same text.

use crate::{CoSignError, Result};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use std::fmt;
use std::str::FromStr;

/// Prefix of Ed25519 identity strings
pub const ED25519_PREFIX: &str = "ed25519:";

/// Public identity of a signer
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SignerIdentity {
    verifying_key: VerifyingKey,
}

impl SignerIdentity {
    /// Wrap a verifying key
    pub fn new(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }

    /// Parse raw 32-byte public key material
    pub fn from_public_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| {
            CoSignError::InvalidKey(format!("public key must be 32 bytes, got {}", bytes.len()))
        })?;
        let verifying_key = VerifyingKey::from_bytes(&array)
            .map_err(|e| CoSignError::InvalidKey(format!("invalid public key: {e}")))?;
        Ok(Self { verifying_key })
    }

    /// Underlying verifying key
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Verify `signature` over `message`
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match Signature::from_slice(signature) {
            Ok(signature) => self.verifying_key.verify(message, &signature).is_ok(),
            Err(_) => false,
        }
    }
}

impl fmt::Display for SignerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ED25519_PREFIX}{}",
            hex::encode(self.verifying_key.as_bytes())
        )
    }
}

impl fmt::Debug for SignerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignerIdentity({self})")
    }
}

impl FromStr for SignerIdentity {
    type Err = CoSignError;

    fn from_str(s: &str) -> Result<Self> {
        let key_hex = s
            .strip_prefix(ED25519_PREFIX)
            .ok_or_else(|| CoSignError::InvalidIdentity(format!("unsupported identity {s}")))?;
        let bytes = hex::decode(key_hex)
            .map_err(|e| CoSignError::InvalidIdentity(format!("{s}: {e}")))?;
        Self::from_public_bytes(&bytes)
            .map_err(|e| CoSignError::InvalidIdentity(format!("{s}: {e}")))
    }
}
