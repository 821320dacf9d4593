//! Sign request and reply
//!
//! A signer receives the action to co-sign together with its own key pair,
//! and answers with the transaction re-encoded after filling its slot.

use crate::serde::digests_base64;
use medchain_core::InstructionDigests;
use medchain_signature::SignerRoster;
use serde::{Deserialize, Serialize};

/// Transaction to co-sign, as produced by a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Base64 encoded transaction
    pub transaction: String,
    /// Digest of every instruction, keyed by index
    #[serde(with = "digests_base64")]
    pub instruction_digests: InstructionDigests,
    /// Identity string to signature slot
    pub signers: SignerRoster,
}

/// Metadata of a pending action, echoed back in the reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInfo {
    /// Action identifier chosen by the proposer
    #[serde(default)]
    pub id: String,
    /// Kind of action (for example `add_user` or `add_hospital`)
    #[serde(default)]
    pub action_type: String,
    /// Identity of the proposer
    #[serde(default)]
    pub initiator: String,
    /// Workflow status as tracked by the proposer
    #[serde(default)]
    pub status: String,
    /// Transaction to sign
    #[serde(default)]
    pub action: Option<Action>,
}

/// Request to co-sign an action with the given key pair
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequest {
    /// Hex encoded Ed25519 public key (optional when the private key is given)
    #[serde(default)]
    pub public_key: String,
    /// Hex encoded Ed25519 private key
    #[serde(default)]
    pub private_key: String,
    /// What to sign
    #[serde(default)]
    pub action_info: Option<ActionInfo>,
}

impl std::fmt::Debug for SignRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignRequest")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("action_info", &self.action_info)
            .finish()
    }
}

/// Successful sign reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignReply {
    /// Identity of the signer that filled its slot
    pub signer_id: String,
    /// Action info from the request
    pub action_info: ActionInfo,
    /// Transaction as received
    pub old_transaction: String,
    /// Transaction with the signer's slot filled, base64 encoded
    pub signed_transaction: String,
}

/// Error body returned with a non-success status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// HTTP status code
    pub status: u16,
    /// Human readable message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_with_missing_fields() {
        let request: SignRequest = serde_json::from_str("{}").unwrap();
        assert!(request.public_key.is_empty());
        assert!(request.action_info.is_none());

        let request: SignRequest =
            serde_json::from_str(r#"{"private_key":"00","action_info":{"id":"a1"}}"#).unwrap();
        let info = request.action_info.unwrap();
        assert_eq!(info.id, "a1");
        assert!(info.action.is_none());
    }

    #[test]
    fn test_action_json_shape() {
        let mut digests = InstructionDigests::new();
        digests.insert(0, vec![1, 2, 3]);
        let action = Action {
            transaction: "dHg=".into(),
            instruction_digests: digests,
            signers: SignerRoster::from_identities(["ed25519:aa"]),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "transaction": "dHg=",
                "instruction_digests": {"0": "AQID"},
                "signers": {"ed25519:aa": 0}
            })
        );
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let request = SignRequest {
            private_key: "deadbeef".into(),
            ..SignRequest::default()
        };
        assert!(!format!("{request:?}").contains("deadbeef"));
    }
}
