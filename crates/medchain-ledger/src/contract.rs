//! Query ledger contract
//!
//! Deterministic state machine run by every replica. Each entry point reads
//! the darc id of the relevant instance from the host, works on a copy of
//! the record store, and returns the state changes for the host to persist.
//! The contract's own store is only replaced once an operation succeeds.

use crate::errors::ContractError;
use crate::record_store::RecordStore;
use crate::Result;
use medchain_core::{
    DarcId, InstanceId, Instruction, Payload, ReadOnlyStateTrie, StateAction, StateChange,
    VerificationOptions, QUERY_CONTRACT_ID,
};
use std::str::FromStr;
use tracing::{debug, info};

/// Invoke command accepted by the query contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `update`
    Update,
    /// `verifystatus`
    VerifyStatus,
}

impl FromStr for Command {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "update" => Ok(Command::Update),
            "verifystatus" => Ok(Command::VerifyStatus),
            other => Err(ContractError::UnsupportedCommand {
                command: other.to_string(),
            }),
        }
    }
}

/// Operation selected by an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Spawn a new query instance
    Create,
    /// Apply update arguments
    Update,
    /// Check approval
    VerifyStatus,
}

impl Operation {
    /// Resolve the operation an instruction asks for
    pub fn of(instruction: &Instruction) -> Result<Self> {
        match &instruction.payload {
            Payload::Spawn(_) => Ok(Operation::Create),
            Payload::Invoke(invoke) => Ok(match invoke.command.parse()? {
                Command::Update => Operation::Update,
                Command::VerifyStatus => Operation::VerifyStatus,
            }),
        }
    }
}

/// Contract interface the ledger runtime drives
pub trait Contract {
    /// Create a new instance from a spawn instruction
    fn spawn(
        &mut self,
        rst: &dyn ReadOnlyStateTrie,
        instruction: &Instruction,
    ) -> Result<Vec<StateChange>>;

    /// Run an invoke instruction against the instance
    fn invoke(
        &mut self,
        rst: &dyn ReadOnlyStateTrie,
        instruction: &Instruction,
    ) -> Result<Vec<StateChange>>;

    /// Verify a deferred instruction's authorization, ignoring counters
    fn verify_deferred_instruction(
        &self,
        rst: &dyn ReadOnlyStateTrie,
        instruction: &Instruction,
        context_hash: &[u8],
    ) -> Result<()> {
        rst.verify_instruction(instruction, context_hash, VerificationOptions::deferred())
            .map_err(|e| ContractError::Verification(e.to_string()))
    }
}

/// Query ledger contract holding the decoded record store of one instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContract {
    store: RecordStore,
}

impl QueryContract {
    /// Create a contract with an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the contract from an instance's stored value
    pub fn from_bytes(value: &[u8]) -> Result<Self> {
        Ok(Self {
            store: RecordStore::from_bytes(value)?,
        })
    }

    /// Current record store
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Dispatch an instruction to the matching entry point
    pub fn execute(
        &mut self,
        rst: &dyn ReadOnlyStateTrie,
        instruction: &Instruction,
    ) -> Result<Vec<StateChange>> {
        let contract_id = instruction.payload.contract_id();
        if contract_id != QUERY_CONTRACT_ID {
            return Err(ContractError::WrongContract {
                contract_id: contract_id.to_string(),
            });
        }
        match Operation::of(instruction)? {
            Operation::Create => self.spawn(rst, instruction),
            Operation::Update | Operation::VerifyStatus => self.invoke(rst, instruction),
        }
    }

    fn state_change(
        action: StateAction,
        instance_id: InstanceId,
        store: &RecordStore,
        darc_id: DarcId,
    ) -> Result<StateChange> {
        Ok(StateChange::new(
            action,
            instance_id,
            QUERY_CONTRACT_ID,
            store.to_bytes()?,
            darc_id,
        ))
    }
}

fn resolve_darc(rst: &dyn ReadOnlyStateTrie, instance_id: &InstanceId) -> Result<DarcId> {
    rst.get_values(instance_id)
        .map(|values| values.darc_id)
        .map_err(|e| ContractError::DarcUnavailable {
            instance: *instance_id,
            reason: e.to_string(),
        })
}

impl Contract for QueryContract {
    fn spawn(
        &mut self,
        rst: &dyn ReadOnlyStateTrie,
        instruction: &Instruction,
    ) -> Result<Vec<StateChange>> {
        let Payload::Spawn(spawn) = &instruction.payload else {
            return Err(ContractError::WrongPayload { expected: "spawn" });
        };
        let darc_id = resolve_darc(rst, &instruction.instance_id)?;

        let mut store = self.store.clone();
        store.append_all(&spawn.args)?;

        let instance_id = instruction
            .derive_id("")
            .map_err(|e| ContractError::Encoding(e.to_string()))?;
        let change = Self::state_change(StateAction::Create, instance_id, &store, darc_id)?;

        info!(
            instance = %instance_id,
            records = store.len(),
            "Spawned query instance"
        );
        self.store = store;
        Ok(vec![change])
    }

    fn invoke(
        &mut self,
        rst: &dyn ReadOnlyStateTrie,
        instruction: &Instruction,
    ) -> Result<Vec<StateChange>> {
        let Payload::Invoke(invoke) = &instruction.payload else {
            return Err(ContractError::WrongPayload { expected: "invoke" });
        };
        let command: Command = invoke.command.parse()?;
        let darc_id = resolve_darc(rst, &instruction.instance_id)?;

        match command {
            Command::Update => {
                let mut store = self.store.clone();
                store.apply_update(&invoke.args)?;
                let change = Self::state_change(
                    StateAction::Update,
                    instruction.instance_id,
                    &store,
                    darc_id,
                )?;
                debug!(
                    instance = %instruction.instance_id,
                    records = store.len(),
                    "Updated query instance"
                );
                self.store = store;
                Ok(vec![change])
            }
            Command::VerifyStatus => {
                self.store.verify_status(&invoke.args)?;
                // Emitted as Create for the same instance; the host relies on it.
                let change = Self::state_change(
                    StateAction::Create,
                    instruction.instance_id,
                    &self.store,
                    darc_id,
                )?;
                debug!(instance = %instruction.instance_id, "Verified query status");
                Ok(vec![change])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use medchain_core::{Arguments, MedchainError, StateValues};
    use std::cell::Cell;

    /// Host stub returning a fixed darc and counting lookups
    struct StubHost {
        darc: Option<DarcId>,
        lookups: Cell<usize>,
    }

    impl StubHost {
        fn with_darc(darc: &[u8]) -> Self {
            Self {
                darc: Some(DarcId::new(darc)),
                lookups: Cell::new(0),
            }
        }

        fn without_darc() -> Self {
            Self {
                darc: None,
                lookups: Cell::new(0),
            }
        }
    }

    impl ReadOnlyStateTrie for StubHost {
        fn get_values(&self, instance_id: &InstanceId) -> medchain_core::Result<StateValues> {
            self.lookups.set(self.lookups.get() + 1);
            let darc_id = self
                .darc
                .clone()
                .ok_or_else(|| MedchainError::not_found(format!("instance {instance_id}")))?;
            Ok(StateValues {
                value: Vec::new(),
                contract_id: QUERY_CONTRACT_ID.to_string(),
                darc_id,
                version: 0,
            })
        }

        fn verify_instruction(
            &self,
            _instruction: &Instruction,
            _message: &[u8],
            options: VerificationOptions,
        ) -> medchain_core::Result<()> {
            if options.ignore_counters {
                Ok(())
            } else {
                Err(MedchainError::permission_denied("counters checked"))
            }
        }
    }

    fn invoke(command: &str, pairs: &[(&str, &str)]) -> Instruction {
        Instruction::invoke(
            InstanceId::new([3; 32]),
            QUERY_CONTRACT_ID,
            command,
            Arguments::from_pairs(pairs.iter().copied()),
        )
    }

    #[test]
    fn test_operation_dispatch() {
        assert_eq!(Operation::of(&invoke("update", &[])).unwrap(), Operation::Update);
        assert_eq!(
            Operation::of(&invoke("verifystatus", &[])).unwrap(),
            Operation::VerifyStatus
        );
        assert_matches!(
            Operation::of(&invoke("delete", &[])),
            Err(ContractError::UnsupportedCommand { command }) if command == "delete"
        );
    }

    #[test]
    fn test_spawn_carries_parent_darc() {
        let host = StubHost::with_darc(b"darc:owner");
        let instruction = Instruction::spawn(
            InstanceId::new([1; 32]),
            QUERY_CONTRACT_ID,
            Arguments::from_pairs([("q1", "Requested")]),
        );
        let mut contract = QueryContract::new();

        let changes = contract.spawn(&host, &instruction).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, StateAction::Create);
        assert_eq!(changes[0].instance_id, instruction.derive_id("").unwrap());
        assert_eq!(changes[0].darc_id, DarcId::new(b"darc:owner".to_vec()));
        assert_eq!(changes[0].contract_id, QUERY_CONTRACT_ID);
        assert_eq!(contract.store().len(), 1);
    }

    #[test]
    fn test_spawn_fails_without_darc() {
        let host = StubHost::without_darc();
        let instruction = Instruction::spawn(
            InstanceId::new([1; 32]),
            QUERY_CONTRACT_ID,
            Arguments::from_pairs([("q1", "Requested")]),
        );
        let mut contract = QueryContract::new();

        assert_matches!(
            contract.spawn(&host, &instruction),
            Err(ContractError::DarcUnavailable { .. })
        );
        assert!(contract.store().is_empty());
    }

    #[test]
    fn test_non_utf8_update_emits_nothing() {
        let host = StubHost::with_darc(b"d");
        let mut instruction = invoke("update", &[("q1", "Approved")]);
        if let Payload::Invoke(invoke) = &mut instruction.payload {
            invoke.args.0[0].value = vec![0xc3, 0x28];
        }
        let mut contract = QueryContract::new();

        assert_matches!(
            contract.invoke(&host, &instruction),
            Err(ContractError::InvalidStatus { id }) if id == "q1"
        );
        assert!(contract.store().is_empty());
    }

    #[test]
    fn test_unsupported_command_is_rejected_before_darc_lookup() {
        let host = StubHost::with_darc(b"d");
        let mut contract = QueryContract::new();
        assert_matches!(
            contract.invoke(&host, &invoke("approve", &[("q1", "")])),
            Err(ContractError::UnsupportedCommand { .. })
        );
        assert_eq!(host.lookups.get(), 0);
    }

    #[test]
    fn test_failed_verify_emits_nothing_and_keeps_store() {
        let host = StubHost::with_darc(b"d");
        let mut contract = QueryContract::new();
        contract
            .invoke(&host, &invoke("update", &[("q1", "Requested")]))
            .unwrap();
        let before = contract.clone();

        assert_matches!(
            contract.invoke(&host, &invoke("verifystatus", &[("q1", "")])),
            Err(ContractError::NotApproved { .. })
        );
        assert_eq!(contract, before);
    }

    #[test]
    fn test_verify_status_emits_create_for_same_instance() {
        let host = StubHost::with_darc(b"d");
        let mut contract = QueryContract::new();
        contract
            .invoke(&host, &invoke("update", &[("q1", "Approved")]))
            .unwrap();

        let changes = contract
            .invoke(&host, &invoke("verifystatus", &[("q1", "")]))
            .unwrap();
        assert_eq!(changes[0].action, StateAction::Create);
        assert_eq!(changes[0].instance_id, InstanceId::new([3; 32]));
        assert_eq!(
            RecordStore::from_bytes(&changes[0].value).unwrap(),
            *contract.store()
        );
    }

    #[test]
    fn test_execute_rejects_other_contracts() {
        let host = StubHost::with_darc(b"d");
        let instruction = Instruction::invoke(
            InstanceId::new([3; 32]),
            "valueContract",
            "update",
            Arguments::new(),
        );
        assert_matches!(
            QueryContract::new().execute(&host, &instruction),
            Err(ContractError::WrongContract { .. })
        );
    }

    #[test]
    fn test_deferred_verification_ignores_counters() {
        let host = StubHost::with_darc(b"d");
        let contract = QueryContract::new();
        contract
            .verify_deferred_instruction(&host, &invoke("update", &[]), b"ctx")
            .unwrap();
    }
}
