//! MedChain Core
//!
//! Foundation types shared by the query ledger contract and the multi-signer
//! co-signing protocol:
//!
//! - `MedchainError`: unified error with stable categories
//! - `InstanceId`, `DarcId`: host-assigned identifiers
//! - `ClientTransaction`, `Instruction`, `SignatureSlot`: transaction model
//! - `StateChange`: contract output persisted by the host
//! - `ReadOnlyStateTrie`: the host runtime as seen by a contract
//!
//! Everything here is pure and synchronous.

#![forbid(unsafe_code)]

/// Host runtime interface
pub mod effects;

/// Unified error handling
pub mod errors;

/// SHA-256 hashing
pub mod hash;

/// Instance and darc identifiers
pub mod identifiers;

/// Canonical binary serialization
pub mod serialization;

/// State changes and stored instance values
pub mod state;

/// Transactions, instructions and signature slots
pub mod transaction;

pub use effects::{ReadOnlyStateTrie, VerificationOptions};
pub use errors::{MedchainError, Result};
pub use hash::Hash32;
pub use identifiers::{DarcId, InstanceId, QUERY_CONTRACT_ID};
pub use state::{StateAction, StateChange, StateValues};
pub use transaction::{
    transaction_hash, Argument, Arguments, ClientTransaction, Instruction, InstructionDigests,
    Invoke, Payload, SignatureSlot, Spawn,
};
