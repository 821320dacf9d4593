//! In-memory host state trie
//!
//! A single-node stand-in for the replicated ledger: it stores instance
//! values, checks instruction signatures and replay counters, runs the query
//! contract and applies the state changes it returns. Transactions are
//! all-or-nothing.

use crate::contract::QueryContract;
use medchain_core::{
    ClientTransaction, DarcId, InstanceId, Instruction, MedchainError, Payload, ReadOnlyStateTrie,
    Result, StateAction, StateChange, StateValues, VerificationOptions, QUERY_CONTRACT_ID,
};
use medchain_signature::verify_instruction_signatures;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Contract id of ownership instances
pub const DARC_CONTRACT_ID: &str = "darc";

/// In-memory instance store with signer counters
#[derive(Debug, Clone, Default)]
pub struct MemoryStateTrie {
    instances: BTreeMap<InstanceId, StateValues>,
    counters: BTreeMap<String, u64>,
}

impl MemoryStateTrie {
    /// Create an empty trie
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ownership instance that query instances can be spawned from
    pub fn insert_darc(&mut self, instance_id: InstanceId, darc_id: DarcId) {
        self.instances.insert(
            instance_id,
            StateValues {
                value: Vec::new(),
                contract_id: DARC_CONTRACT_ID.to_string(),
                darc_id,
                version: 0,
            },
        );
    }

    /// Stored values of an instance, if any
    pub fn get(&self, instance_id: &InstanceId) -> Option<&StateValues> {
        self.instances.get(instance_id)
    }

    /// Last counter seen for an identity (zero when never seen)
    pub fn counter(&self, identity: &str) -> u64 {
        self.counters.get(identity).copied().unwrap_or(0)
    }

    /// Last counters of every identity seen so far
    pub fn counters(&self) -> &BTreeMap<String, u64> {
        &self.counters
    }

    /// Persist state changes in order
    pub fn apply(&mut self, changes: &[StateChange]) -> Result<()> {
        for change in changes {
            match change.action {
                StateAction::Create => {
                    let version = match self.instances.get(&change.instance_id) {
                        Some(existing) => {
                            warn!(
                                instance = %change.instance_id,
                                "Create targets an existing instance; overwriting"
                            );
                            existing.version + 1
                        }
                        None => 0,
                    };
                    self.instances.insert(
                        change.instance_id,
                        StateValues {
                            value: change.value.clone(),
                            contract_id: change.contract_id.clone(),
                            darc_id: change.darc_id.clone(),
                            version,
                        },
                    );
                }
                StateAction::Update => {
                    let existing = self.instances.get_mut(&change.instance_id).ok_or_else(|| {
                        MedchainError::not_found(format!(
                            "cannot update missing instance {}",
                            change.instance_id
                        ))
                    })?;
                    existing.value.clone_from(&change.value);
                    existing.darc_id = change.darc_id.clone();
                    existing.version += 1;
                }
                StateAction::Remove => {
                    self.instances.remove(&change.instance_id).ok_or_else(|| {
                        MedchainError::not_found(format!(
                            "cannot remove missing instance {}",
                            change.instance_id
                        ))
                    })?;
                }
            }
            debug!(action = %change.action, instance = %change.instance_id, "Applied state change");
        }
        Ok(())
    }

    /// Verify, run and apply one instruction
    pub fn execute_instruction(&mut self, instruction: &Instruction) -> Result<Vec<StateChange>> {
        self.run(0, instruction)
    }

    /// Run every instruction of a transaction; nothing is kept on failure
    pub fn execute_transaction(
        &mut self,
        transaction: &ClientTransaction,
    ) -> Result<Vec<StateChange>> {
        let mut staged = self.clone();
        let mut changes = Vec::new();
        for (index, instruction) in transaction.instructions.iter().enumerate() {
            changes.extend(staged.run(index, instruction)?);
        }
        *self = staged;
        Ok(changes)
    }

    fn run(&mut self, index: usize, instruction: &Instruction) -> Result<Vec<StateChange>> {
        let digest = instruction.digest()?;
        self.check_instruction(index, instruction, &digest, VerificationOptions::default())?;

        let mut contract = match &instruction.payload {
            Payload::Spawn(_) => QueryContract::new(),
            Payload::Invoke(_) => {
                let values = self.get_values(&instruction.instance_id)?;
                if values.contract_id != QUERY_CONTRACT_ID {
                    return Err(MedchainError::invalid(format!(
                        "instance {} belongs to contract {}",
                        instruction.instance_id, values.contract_id
                    )));
                }
                QueryContract::from_bytes(&values.value)?
            }
        };

        let changes = contract.execute(&*self, instruction)?;
        self.apply(&changes)?;
        for (slot, counter) in instruction.signatures.iter().zip(&instruction.signer_counters) {
            self.counters.insert(slot.signer.clone(), *counter);
        }
        Ok(changes)
    }

    fn check_instruction(
        &self,
        index: usize,
        instruction: &Instruction,
        message: &[u8],
        options: VerificationOptions,
    ) -> Result<()> {
        if !options.ignore_counters {
            if instruction.signer_counters.len() != instruction.signatures.len() {
                return Err(MedchainError::invalid(format!(
                    "instruction {index} has {} counters for {} signers",
                    instruction.signer_counters.len(),
                    instruction.signatures.len()
                )));
            }
            for (slot, counter) in instruction.signatures.iter().zip(&instruction.signer_counters) {
                let expected = self.counter(&slot.signer) + 1;
                if *counter != expected {
                    return Err(MedchainError::permission_denied(format!(
                        "instruction {index}: counter {counter} of {} should be {expected}",
                        slot.signer
                    )));
                }
            }
        }
        verify_instruction_signatures(index, instruction, message)?;
        Ok(())
    }
}

impl ReadOnlyStateTrie for MemoryStateTrie {
    fn get_values(&self, instance_id: &InstanceId) -> Result<StateValues> {
        self.instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| MedchainError::not_found(format!("instance {instance_id}")))
    }

    fn verify_instruction(
        &self,
        instruction: &Instruction,
        message: &[u8],
        options: VerificationOptions,
    ) -> Result<()> {
        self.check_instruction(0, instruction, message, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use medchain_core::Arguments;

    fn change(action: StateAction, id: u8, value: &[u8]) -> StateChange {
        StateChange::new(
            action,
            InstanceId::new([id; 32]),
            QUERY_CONTRACT_ID,
            value.to_vec(),
            DarcId::new(b"owner".to_vec()),
        )
    }

    #[test]
    fn test_apply_tracks_versions() {
        let mut trie = MemoryStateTrie::new();
        trie.apply(&[change(StateAction::Create, 1, b"a")]).unwrap();
        trie.apply(&[change(StateAction::Update, 1, b"b")]).unwrap();

        let values = trie.get(&InstanceId::new([1; 32])).unwrap();
        assert_eq!(values.value, b"b".to_vec());
        assert_eq!(values.version, 1);

        trie.apply(&[change(StateAction::Create, 1, b"c")]).unwrap();
        assert_eq!(trie.get(&InstanceId::new([1; 32])).unwrap().version, 2);
    }

    #[test]
    fn test_update_and_remove_need_an_instance() {
        let mut trie = MemoryStateTrie::new();
        assert_matches!(
            trie.apply(&[change(StateAction::Update, 9, b"x")]),
            Err(MedchainError::NotFound { .. })
        );
        assert_matches!(
            trie.apply(&[change(StateAction::Remove, 9, b"")]),
            Err(MedchainError::NotFound { .. })
        );
    }

    #[test]
    fn test_unsigned_instruction_runs_without_counters() {
        let mut trie = MemoryStateTrie::new();
        let parent = InstanceId::new([0; 32]);
        trie.insert_darc(parent, DarcId::new(b"owner".to_vec()));

        let spawn = Instruction::spawn(
            parent,
            QUERY_CONTRACT_ID,
            Arguments::from_pairs([("q1", "Requested")]),
        );
        let changes = trie.execute_instruction(&spawn).unwrap();
        let created = trie.get(&changes[0].instance_id).unwrap();
        assert_eq!(created.darc_id, DarcId::new(b"owner".to_vec()));
        assert!(trie.counters().is_empty());
    }

    #[test]
    fn test_invoke_on_darc_instance_is_rejected() {
        let mut trie = MemoryStateTrie::new();
        let parent = InstanceId::new([0; 32]);
        trie.insert_darc(parent, DarcId::new(b"owner".to_vec()));

        let update = Instruction::invoke(
            parent,
            QUERY_CONTRACT_ID,
            "update",
            Arguments::from_pairs([("q1", "Approved")]),
        );
        assert_matches!(
            trie.execute_instruction(&update),
            Err(MedchainError::Invalid { .. })
        );
    }
}
