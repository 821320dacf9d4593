//! Merging partially signed copies
//!
//! Signers work on independent copies of the same prepared transaction. The
//! proposer folds their slots back into one transaction before submitting.

use crate::{CoSignError, Result};
use medchain_core::{transaction_hash, ClientTransaction};
use tracing::debug;

/// Copy every filled slot of `other` into `base`.
///
/// Both copies must have the same body (same [`transaction_hash`]). A slot
/// that is signed in both copies keeps the value from `other`. Returns the
/// number of slots copied.
pub fn merge_signatures(base: &mut ClientTransaction, other: &ClientTransaction) -> Result<usize> {
    if base.len() != other.len() {
        return Err(CoSignError::TransactionMismatch(format!(
            "{} instructions against {}",
            base.len(),
            other.len()
        )));
    }
    if transaction_hash(base)? != transaction_hash(other)? {
        return Err(CoSignError::TransactionMismatch(
            "instruction bodies differ".to_string(),
        ));
    }

    let mut copied = 0;
    for (ours, theirs) in base.instructions.iter_mut().zip(&other.instructions) {
        for (slot, incoming) in ours.signatures.iter_mut().zip(&theirs.signatures) {
            if incoming.is_signed() {
                slot.signature.clone_from(&incoming.signature);
                copied += 1;
            }
        }
    }
    debug!(copied, "Merged signature slots");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosign::cosign;
    use crate::prepare::prepare_transaction;
    use crate::roster::SignerRoster;
    use crate::signer::{Ed25519Signer, Signer};
    use crate::verify::verify_cosigned;
    use medchain_core::{Arguments, InstanceId, Instruction, QUERY_CONTRACT_ID};
    use std::collections::BTreeMap;

    #[test]
    fn test_merge_combines_independent_signers() {
        let alice = Ed25519Signer::from_seed(&[21u8; 32]);
        let bob = Ed25519Signer::from_seed(&[22u8; 32]);
        let roster = SignerRoster::from_identities([
            alice.identity().to_string(),
            bob.identity().to_string(),
        ]);
        let instructions = vec![
            Instruction::invoke(
                InstanceId::new([1; 32]),
                QUERY_CONTRACT_ID,
                "update",
                Arguments::from_pairs([("q1", "Approved")]),
            ),
            Instruction::invoke(
                InstanceId::new([1; 32]),
                QUERY_CONTRACT_ID,
                "verifystatus",
                Arguments::from_pairs([("q1", "")]),
            ),
        ];
        let prepared = prepare_transaction(instructions, &roster, &BTreeMap::new()).unwrap();
        let digests = &prepared.instruction_digests;

        let mut from_alice = cosign(prepared.transaction.clone(), digests, &roster, &alice).unwrap();
        let from_bob = cosign(prepared.transaction, digests, &roster, &bob).unwrap();

        assert_eq!(merge_signatures(&mut from_alice, &from_bob).unwrap(), 2);
        verify_cosigned(&from_alice).unwrap();
    }

    #[test]
    fn test_merge_rejects_different_bodies() {
        let roster = SignerRoster::from_identities(["ed25519:aa"]);
        let a = prepare_transaction(
            vec![Instruction::spawn(
                InstanceId::new([0; 32]),
                QUERY_CONTRACT_ID,
                Arguments::from_pairs([("q1", "Requested")]),
            )],
            &roster,
            &BTreeMap::new(),
        )
        .unwrap();
        let b = prepare_transaction(
            vec![Instruction::spawn(
                InstanceId::new([0; 32]),
                QUERY_CONTRACT_ID,
                Arguments::from_pairs([("q2", "Requested")]),
            )],
            &roster,
            &BTreeMap::new(),
        )
        .unwrap();

        let mut base = a.transaction;
        let err = merge_signatures(&mut base, &b.transaction).unwrap_err();
        assert!(matches!(err, CoSignError::TransactionMismatch(_)));
        assert!(matches!(
            merge_signatures(&mut base, &ClientTransaction::default()),
            Err(CoSignError::TransactionMismatch(_))
        ));
    }
}
