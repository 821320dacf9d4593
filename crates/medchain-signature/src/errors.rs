//! Co-signing errors

use medchain_core::MedchainError;

/// Errors raised while preparing, signing, merging or verifying transactions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoSignError {
    /// The digest map does not have one entry per instruction
    #[error("You should provide as many digests as instructions: got {digests} digests for {instructions} instructions")]
    DigestCountMismatch {
        /// Number of digests supplied
        digests: usize,
        /// Number of instructions in the transaction
        instructions: usize,
    },

    /// The digest map has the right size but lacks an instruction index
    #[error("No digest was provided for instruction {index}")]
    MissingDigest {
        /// Instruction index without a digest
        index: usize,
    },

    /// The calling signer has no slot in the roster
    #[error("Your identity is not in the signers list: {identity}")]
    IdentityNotInRoster {
        /// Identity string of the calling signer
        identity: String,
    },

    /// The roster slot does not exist in an instruction's signature array
    #[error("Signer slot {slot} is out of range for instruction {instruction} with {slots} signature slots")]
    SlotOutOfRange {
        /// Instruction index
        instruction: usize,
        /// Slot index from the roster
        slot: usize,
        /// Length of the instruction's signature array
        slots: usize,
    },

    /// The roster does not map to a dense, duplicate-free slot layout
    #[error("Invalid signer roster: {0}")]
    InvalidRoster(String),

    /// Key material could not be loaded
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// A signer identity string could not be parsed
    #[error("Invalid signer identity: {0}")]
    InvalidIdentity(String),

    /// A signature slot has not been filled
    #[error("Instruction {instruction} is missing the signature of {signer}")]
    MissingSignature {
        /// Instruction index
        instruction: usize,
        /// Identity reserved for the empty slot
        signer: String,
    },

    /// A filled slot does not verify against its identity
    #[error("Invalid signature from {signer} on instruction {instruction}")]
    InvalidSignature {
        /// Instruction index
        instruction: usize,
        /// Identity of the slot that failed verification
        signer: String,
    },

    /// The next replay counter of a signer does not fit in a `u64`
    #[error("Signer counter of {signer} overflows at instruction {instruction}")]
    CounterOverflow {
        /// Identity whose counter overflowed
        signer: String,
        /// Instruction index
        instruction: usize,
    },

    /// Two copies of a transaction do not share the same body
    #[error("Transactions do not match: {0}")]
    TransactionMismatch(String),

    /// Underlying signing primitive failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Transaction digest or encoding failed
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

impl From<MedchainError> for CoSignError {
    fn from(err: MedchainError) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<CoSignError> for MedchainError {
    fn from(err: CoSignError) -> Self {
        match &err {
            CoSignError::DigestCountMismatch { .. }
            | CoSignError::MissingDigest { .. }
            | CoSignError::SlotOutOfRange { .. }
            | CoSignError::CounterOverflow { .. } => MedchainError::state(err.to_string()),
            CoSignError::IdentityNotInRoster { .. }
            | CoSignError::MissingSignature { .. }
            | CoSignError::InvalidSignature { .. } => {
                MedchainError::permission_denied(err.to_string())
            }
            CoSignError::InvalidRoster(_)
            | CoSignError::InvalidKey(_)
            | CoSignError::InvalidIdentity(_)
            | CoSignError::TransactionMismatch(_) => MedchainError::invalid(err.to_string()),
            CoSignError::Signing(_) => MedchainError::crypto(err.to_string()),
            CoSignError::Encoding(_) => MedchainError::serialization(err.to_string()),
        }
    }
}
