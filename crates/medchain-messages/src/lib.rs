//! MedChain Messages
//!
//! JSON wire types exchanged between proposers, signers and the admin
//! signing service:
//!
//! - **Sign**: `SignRequest`, `SignReply`, `ErrorReply`
//! - **Proposal**: `SigningProposal`, `CommitTransactionRequest`
//!
//! Transactions are carried as standard base64 strings, digests as a map of
//! instruction index to base64 digest, rosters as a map of identity string
//! to slot index.

#![forbid(unsafe_code)]

pub mod proposal;
pub mod serde;
pub mod sign;

pub use proposal::{CommitTransactionRequest, SigningProposal};
pub use sign::{Action, ActionInfo, ErrorReply, SignReply, SignRequest};

use medchain_core::{MedchainError, Result};

/// Decode a JSON message body
pub fn from_json<T: ::serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| MedchainError::serialization(format!("Invalid JSON message: {e}")))
}

/// Encode a message as JSON
pub fn to_json<T: ::serde::Serialize>(message: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(message)
        .map_err(|e| MedchainError::serialization(format!("Failed to encode message: {e}")))
}
