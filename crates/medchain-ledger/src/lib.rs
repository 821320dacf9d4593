//! MedChain Ledger
//!
//! The query ledger contract: an ordered store of query records kept inside
//! a ledger instance, with three operations.
//!
//! - **Create** (spawn): append one record per argument to a new instance
//! - **Update** (invoke `update`): overwrite, remove or append records
//! - **VerifyStatus** (invoke `verifystatus`): check that a query is approved
//!
//! Ownership is not decided here. Every operation reads the darc id of the
//! instance it works on from the host and carries it into the state changes
//! it emits.
//!
//! [`memory::MemoryStateTrie`] is an in-memory host that verifies signatures
//! and counters, runs the contract and applies its state changes.

#![forbid(unsafe_code)]

/// Query ledger contract
pub mod contract;

/// Contract errors
pub mod errors;

/// In-memory host state trie
pub mod memory;

/// Query record store
pub mod record_store;

pub use contract::{Command, Contract, Operation, QueryContract};
pub use errors::ContractError;
pub use memory::{MemoryStateTrie, DARC_CONTRACT_ID};
pub use record_store::{QueryRecord, RecordStore, APPROVED_STATUS};

/// Result type for contract operations
pub type Result<T> = std::result::Result<T, ContractError>;
