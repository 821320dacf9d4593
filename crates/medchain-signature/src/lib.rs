//! MedChain Signature
//!
//! Multi-signer co-signing of MedChain transactions. A proposer prepares a
//! transaction with one empty signature slot per roster entry in every
//! instruction; each signer fills its own slot with [`sign_transaction`];
//! the proposer merges the copies and verifies the result before
//! submitting it to the ledger.
//!
//! Signers never coordinate with each other. Slots are disjoint, so
//! signing operations by different signers commute.

#![forbid(unsafe_code)]

/// Co-signing engine
pub mod cosign;

/// Co-signing errors
pub mod errors;

/// Signer identities
pub mod identity;

/// Merging partially signed transactions
pub mod merge;

/// Proposer-side transaction preparation
pub mod prepare;

/// Signer roster
pub mod roster;

/// Signing keys
pub mod signer;

/// Co-signature verification
pub mod verify;

pub use cosign::{cosign, sign_transaction};
pub use errors::CoSignError;
pub use identity::{SignerIdentity, ED25519_PREFIX};
pub use merge::merge_signatures;
pub use prepare::{prepare_transaction, PreparedTransaction};
pub use roster::SignerRoster;
pub use signer::{Ed25519Signer, Signer};
pub use verify::{check_digests, verify_cosigned, verify_instruction_signatures};

/// Result type for co-signing operations
pub type Result<T> = std::result::Result<T, CoSignError>;
