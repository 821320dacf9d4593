//! Contract errors

use medchain_core::{InstanceId, MedchainError};

/// Errors raised by the query ledger contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// Invoke command other than `update` or `verifystatus`
    #[error("MedChain contract only supports spawn/update/verifystatus requests, got {command:?}")]
    UnsupportedCommand {
        /// Command tag that was received
        command: String,
    },

    /// The host could not resolve the ownership token of an instance
    #[error("failed to get the darc ID of instance {instance}: {reason}")]
    DarcUnavailable {
        /// Instance whose darc was requested
        instance: InstanceId,
        /// Host error
        reason: String,
    },

    /// VerifyStatus named a query that is not in the store
    #[error("could not find the query with ID {id}")]
    RecordNotFound {
        /// Query id
        id: String,
    },

    /// VerifyStatus found the query but it is not approved
    #[error("query {id} has status {status} and has not been approved")]
    NotApproved {
        /// Query id
        id: String,
        /// Current status
        status: String,
    },

    /// A spawn or update value is not valid UTF-8 text
    #[error("the status of query {id} is not valid UTF-8")]
    InvalidStatus {
        /// Query id of the offending argument
        id: String,
    },

    /// The instruction carries the wrong payload kind for the entry point
    #[error("expected a {expected} payload")]
    WrongPayload {
        /// Payload kind the entry point handles
        expected: &'static str,
    },

    /// The instruction is addressed to another contract
    #[error("instruction is addressed to contract {contract_id}")]
    WrongContract {
        /// Contract id found in the payload
        contract_id: String,
    },

    /// Record store encoding or decoding failed
    #[error("failed to encode query data: {0}")]
    Encoding(String),

    /// Host refused to verify a deferred instruction
    #[error("instruction verification failed: {0}")]
    Verification(String),
}

impl From<ContractError> for MedchainError {
    fn from(err: ContractError) -> Self {
        match &err {
            ContractError::UnsupportedCommand { .. }
            | ContractError::WrongPayload { .. }
            | ContractError::WrongContract { .. }
            | ContractError::InvalidStatus { .. } => MedchainError::invalid(err.to_string()),
            ContractError::DarcUnavailable { .. } => {
                MedchainError::permission_denied(err.to_string())
            }
            ContractError::RecordNotFound { .. } => MedchainError::not_found(err.to_string()),
            ContractError::NotApproved { .. } => MedchainError::state(err.to_string()),
            ContractError::Encoding(_) => MedchainError::serialization(err.to_string()),
            ContractError::Verification(_) => MedchainError::permission_denied(err.to_string()),
        }
    }
}
