//! Host runtime interface
//!
//! Contracts never touch storage directly. The replicated ledger hands them a
//! read-only view of the state trie and persists the state changes they
//! return. Implementations live outside the contract: the real ledger runtime
//! in production, `medchain_ledger::memory::MemoryStateTrie` in tests.

use crate::identifiers::InstanceId;
use crate::state::StateValues;
use crate::transaction::Instruction;
use crate::Result;

/// Options for instruction verification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerificationOptions {
    /// Skip the replay-counter check (used for deferred instructions)
    pub ignore_counters: bool,
}

impl VerificationOptions {
    /// Options used when verifying deferred instructions
    pub const fn deferred() -> Self {
        Self {
            ignore_counters: true,
        }
    }
}

/// Read-only view of the host state trie
pub trait ReadOnlyStateTrie {
    /// Resolve the stored values of an instance, including its darc id
    fn get_values(&self, instance_id: &InstanceId) -> Result<StateValues>;

    /// Verify the authorization of an instruction over `message`
    fn verify_instruction(
        &self,
        instruction: &Instruction,
        message: &[u8],
        options: VerificationOptions,
    ) -> Result<()>;
}
