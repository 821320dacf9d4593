//! State changes emitted by contracts for the host to persist

use crate::identifiers::{DarcId, InstanceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateAction {
    /// Create a new instance
    Create,
    /// Replace the value of an existing instance
    Update,
    /// Remove an instance
    Remove,
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateAction::Create => write!(f, "create"),
            StateAction::Update => write!(f, "update"),
            StateAction::Remove => write!(f, "remove"),
        }
    }
}

/// A request to the host to change one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    /// What to do
    pub action: StateAction,
    /// Instance the change applies to
    pub instance_id: InstanceId,
    /// Contract owning the instance
    pub contract_id: String,
    /// Encoded instance value
    pub value: Vec<u8>,
    /// Ownership token carried forward from the instance that was read
    pub darc_id: DarcId,
}

impl StateChange {
    /// Create a new state change
    pub fn new(
        action: StateAction,
        instance_id: InstanceId,
        contract_id: impl Into<String>,
        value: Vec<u8>,
        darc_id: DarcId,
    ) -> Self {
        Self {
            action,
            instance_id,
            contract_id: contract_id.into(),
            value,
            darc_id,
        }
    }
}

/// Values the host stores for an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateValues {
    /// Encoded instance value
    pub value: Vec<u8>,
    /// Contract owning the instance
    pub contract_id: String,
    /// Ownership token
    pub darc_id: DarcId,
    /// Number of times the instance has been written
    pub version: u64,
}
