//! Co-signature verification
//!
//! Checks a fully co-signed transaction before it is submitted: every slot
//! must be filled and every signature must verify against the identity the
//! slot was reserved for.

use crate::identity::SignerIdentity;
use crate::{CoSignError, Result};
use medchain_core::{ClientTransaction, Instruction, InstructionDigests};

/// Verify every signature slot of one instruction over `message`.
///
/// `index` only labels errors. An instruction with no slots passes.
pub fn verify_instruction_signatures(
    index: usize,
    instruction: &Instruction,
    message: &[u8],
) -> Result<()> {
    for slot in &instruction.signatures {
        if !slot.is_signed() {
            return Err(CoSignError::MissingSignature {
                instruction: index,
                signer: slot.signer.clone(),
            });
        }
        let identity: SignerIdentity = slot.signer.parse()?;
        if !identity.verify(message, &slot.signature) {
            return Err(CoSignError::InvalidSignature {
                instruction: index,
                signer: slot.signer.clone(),
            });
        }
    }
    Ok(())
}

/// Ensure the supplied digests describe the transaction body
pub fn check_digests(
    transaction: &ClientTransaction,
    instruction_digests: &InstructionDigests,
) -> Result<()> {
    let expected = transaction.instruction_digests()?;
    if expected.len() != instruction_digests.len() {
        return Err(CoSignError::DigestCountMismatch {
            digests: instruction_digests.len(),
            instructions: expected.len(),
        });
    }
    for (index, digest) in &expected {
        match instruction_digests.get(index) {
            None => return Err(CoSignError::MissingDigest { index: *index }),
            Some(supplied) if supplied != digest => {
                return Err(CoSignError::TransactionMismatch(format!(
                    "digest {index} does not match instruction {index}"
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Verify a fully co-signed transaction against its recomputed digests
pub fn verify_cosigned(transaction: &ClientTransaction) -> Result<()> {
    for (index, instruction) in transaction.instructions.iter().enumerate() {
        let digest = instruction.digest()?;
        verify_instruction_signatures(index, instruction, &digest)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosign::cosign;
    use crate::prepare::prepare_transaction;
    use crate::roster::SignerRoster;
    use crate::signer::{Ed25519Signer, Signer};
    use medchain_core::{Arguments, InstanceId, QUERY_CONTRACT_ID};
    use std::collections::BTreeMap;

    fn setup() -> (Ed25519Signer, Ed25519Signer, crate::prepare::PreparedTransaction) {
        let alice = Ed25519Signer::from_seed(&[11u8; 32]);
        let bob = Ed25519Signer::from_seed(&[12u8; 32]);
        let roster = SignerRoster::from_identities([
            alice.identity().to_string(),
            bob.identity().to_string(),
        ]);
        let instruction = Instruction::invoke(
            InstanceId::new([5; 32]),
            QUERY_CONTRACT_ID,
            "verifystatus",
            Arguments::from_pairs([("q1", "")]),
        );
        let prepared = prepare_transaction(vec![instruction], &roster, &BTreeMap::new()).unwrap();
        (alice, bob, prepared)
    }

    #[test]
    fn test_fully_signed_transaction_verifies() {
        let (alice, bob, prepared) = setup();
        let tx = cosign(
            prepared.transaction,
            &prepared.instruction_digests,
            &prepared.signers,
            &alice,
        )
        .unwrap();
        let tx = cosign(tx, &prepared.instruction_digests, &prepared.signers, &bob).unwrap();
        verify_cosigned(&tx).unwrap();
    }

    #[test]
    fn test_missing_signature_is_reported() {
        let (alice, bob, prepared) = setup();
        let tx = cosign(
            prepared.transaction,
            &prepared.instruction_digests,
            &prepared.signers,
            &alice,
        )
        .unwrap();
        let err = verify_cosigned(&tx).unwrap_err();
        assert_eq!(
            err,
            CoSignError::MissingSignature {
                instruction: 0,
                signer: bob.identity().to_string()
            }
        );
    }

    #[test]
    fn test_signature_over_foreign_digest_is_invalid() {
        let (alice, _, prepared) = setup();
        let mut forged = InstructionDigests::new();
        forged.insert(0, vec![0u8; 32]);
        let tx = cosign(prepared.transaction, &forged, &prepared.signers, &alice).unwrap();

        assert!(matches!(
            check_digests(&tx, &forged),
            Err(CoSignError::TransactionMismatch(_))
        ));
        assert!(matches!(
            verify_instruction_signatures(0, &tx.instructions[0], &tx.instructions[0].digest().unwrap()),
            Err(CoSignError::InvalidSignature { instruction: 0, .. })
        ));
    }

    #[test]
    fn test_check_digests_accepts_recomputed_digests() {
        let (_, _, prepared) = setup();
        check_digests(&prepared.transaction, &prepared.instruction_digests).unwrap();
    }
}
