//! Proposer side of a co-signing round
//!
//! Builds the half-signed transaction that is handed to every signer: each
//! instruction gets one empty slot per roster entry and the replay counters
//! the host will expect, and the digests are computed from the resulting
//! unsigned bodies.

use crate::roster::SignerRoster;
use crate::{CoSignError, Result};
use medchain_core::{ClientTransaction, Instruction, InstructionDigests};
use std::collections::BTreeMap;
use tracing::debug;

/// Transaction ready to be distributed to signers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    /// Transaction with empty signature slots
    pub transaction: ClientTransaction,
    /// Digest of every instruction, keyed by index
    pub instruction_digests: InstructionDigests,
    /// Roster shared by all instructions
    pub signers: SignerRoster,
}

/// Lay out signature slots and counters, then compute digests.
///
/// `last_counters` holds the last counter the host has seen per identity;
/// identities without an entry start at zero. Instruction `i` of the
/// transaction uses `last + 1 + i` for every signer; a counter that would
/// pass `u64::MAX` fails with [`CoSignError::CounterOverflow`].
pub fn prepare_transaction(
    instructions: Vec<Instruction>,
    signers: &SignerRoster,
    last_counters: &BTreeMap<String, u64>,
) -> Result<PreparedTransaction> {
    let identities = signers.ordered_identities()?;
    let slots = signers.reserved_slots()?;

    let instructions = instructions
        .into_iter()
        .enumerate()
        .map(|(index, mut instruction)| -> Result<Instruction> {
            instruction.signatures = slots.clone();
            instruction.signer_counters = identities
                .iter()
                .map(|identity| next_counter(last_counters, identity, index))
                .collect::<Result<_>>()?;
            Ok(instruction)
        })
        .collect::<Result<Vec<_>>>()?;

    let transaction = ClientTransaction::new(instructions);
    let instruction_digests = transaction.instruction_digests()?;
    debug!(
        instructions = transaction.len(),
        signers = signers.len(),
        "Prepared transaction for co-signing"
    );

    Ok(PreparedTransaction {
        transaction,
        instruction_digests,
        signers: signers.clone(),
    })
}

fn next_counter(
    last_counters: &BTreeMap<String, u64>,
    identity: &str,
    index: usize,
) -> Result<u64> {
    let last = last_counters.get(identity).copied().unwrap_or(0);
    u64::try_from(index)
        .ok()
        .and_then(|offset| last.checked_add(1)?.checked_add(offset))
        .ok_or_else(|| CoSignError::CounterOverflow {
            signer: identity.to_string(),
            instruction: index,
        })
}
