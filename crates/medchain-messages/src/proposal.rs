//! Proposal and commit messages
//!
//! A proposer publishes a [`SigningProposal`] for each operation that needs
//! several signatures. Once every signer has replied and the copies are
//! merged, the transaction is submitted with a [`CommitTransactionRequest`].

use crate::serde::digests_base64;
use crate::sign::Action;
use medchain_core::{InstructionDigests, Result};
use medchain_signature::{PreparedTransaction, SignerRoster};
use serde::{Deserialize, Serialize};

/// Half-signed transaction offered to the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningProposal {
    /// Identifier of the object the transaction creates or changes
    pub id: String,
    /// Base64 encoded transaction with empty slots
    pub transaction: String,
    /// Digest of every instruction, keyed by index
    #[serde(with = "digests_base64")]
    pub instruction_digests: InstructionDigests,
    /// Identity string to signature slot
    pub signers: SignerRoster,
}

impl SigningProposal {
    /// Encode a prepared transaction as a proposal
    pub fn from_prepared(id: impl Into<String>, prepared: &PreparedTransaction) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            transaction: prepared.transaction.to_base64()?,
            instruction_digests: prepared.instruction_digests.clone(),
            signers: prepared.signers.clone(),
        })
    }

    /// Action a signer is asked to co-sign
    pub fn action(&self) -> Action {
        Action {
            transaction: self.transaction.clone(),
            instruction_digests: self.instruction_digests.clone(),
            signers: self.signers.clone(),
        }
    }
}

/// Submit a fully signed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTransactionRequest {
    /// Base64 encoded transaction
    pub transaction: String,
}
