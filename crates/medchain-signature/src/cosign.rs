//! Co-signing engine
//!
//! Fills one signer's slot in every instruction of a transaction. The caller
//! supplies the per-instruction digests and the roster; the engine signs
//! exactly what it is given.
//!
//! # Trust boundary
//!
//! Digests are **untrusted input**. The engine does not recompute them from
//! the instruction bodies and does not check them against the transaction
//! hash, so a malicious caller can obtain a signature over a digest that does
//! not describe the transaction. Callers that need that guarantee recompute
//! digests first, for example with [`crate::verify::check_digests`].
//!
//! # Failure behaviour
//!
//! All validation (digest count, roster membership, digest presence, slot
//! range) happens before any slot is written, and signatures are produced
//! before the first write, so a failed call leaves the transaction untouched.

use crate::roster::SignerRoster;
use crate::signer::Signer;
use crate::{CoSignError, Result};
use medchain_core::{ClientTransaction, InstructionDigests};
use tracing::debug;

/// Write `signer`'s signature over each instruction digest into its roster
/// slot, in transaction order.
///
/// Slots belonging to other signers are left byte-for-byte unchanged. The
/// signer's own slot is overwritten, so running twice with the same inputs
/// leaves the same result.
pub fn sign_transaction<S: Signer + ?Sized>(
    transaction: &mut ClientTransaction,
    instruction_digests: &InstructionDigests,
    signers: &SignerRoster,
    signer: &S,
) -> Result<()> {
    if instruction_digests.len() != transaction.instructions.len() {
        return Err(CoSignError::DigestCountMismatch {
            digests: instruction_digests.len(),
            instructions: transaction.instructions.len(),
        });
    }

    let identity = signer.identity().to_string();
    let slot = signers
        .slot_of(&identity)
        .ok_or_else(|| CoSignError::IdentityNotInRoster {
            identity: identity.clone(),
        })?;

    let mut signatures = Vec::with_capacity(transaction.instructions.len());
    for (index, instruction) in transaction.instructions.iter().enumerate() {
        let digest = instruction_digests
            .get(&index)
            .ok_or(CoSignError::MissingDigest { index })?;
        if slot >= instruction.signatures.len() {
            return Err(CoSignError::SlotOutOfRange {
                instruction: index,
                slot,
                slots: instruction.signatures.len(),
            });
        }
        signatures.push(signer.sign(digest)?);
    }

    for (instruction, signature) in transaction.instructions.iter_mut().zip(signatures) {
        instruction.signatures[slot].signature = signature;
    }

    debug!(
        signer = %identity,
        slot,
        instructions = transaction.instructions.len(),
        "Signed transaction slot"
    );
    Ok(())
}

/// Owned variant of [`sign_transaction`] returning the signed transaction
pub fn cosign<S: Signer + ?Sized>(
    mut transaction: ClientTransaction,
    instruction_digests: &InstructionDigests,
    signers: &SignerRoster,
    signer: &S,
) -> Result<ClientTransaction> {
    sign_transaction(&mut transaction, instruction_digests, signers, signer)?;
    Ok(transaction)
}
