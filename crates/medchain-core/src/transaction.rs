//! Transaction model shared by the contract and the co-signing protocol
//!
//! A [`ClientTransaction`] is an ordered list of [`Instruction`]s. Each
//! instruction targets one instance, carries a spawn or invoke payload, and
//! owns a fixed-length array of [`SignatureSlot`]s, one per required signer.
//! The digest of an instruction covers everything except the signature bytes,
//! so signers can sign independently and in any order.

use crate::hash::{self, Hash32};
use crate::identifiers::InstanceId;
use crate::serialization;
use crate::{MedchainError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Digest per instruction index, supplied out of band to each signer
pub type InstructionDigests = BTreeMap<usize, Vec<u8>>;

/// One named argument of a spawn or invoke payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name (the query id for the query contract)
    pub name: String,
    /// Raw argument value
    pub value: Vec<u8>,
}

impl Argument {
    /// Create an argument from a name and a value
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Value as text, or `None` when the bytes are not UTF-8
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }
}

/// Ordered list of arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arguments(pub Vec<Argument>);

impl Arguments {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from `(name, value)` string pairs
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: AsRef<str>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| Argument::new(name, value.as_ref().as_bytes()))
                .collect(),
        )
    }

    /// Iterate over arguments in order
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.0.iter()
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Spawn payload: create a new instance of a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    /// Contract to instantiate
    pub contract_id: String,
    /// Initial arguments
    pub args: Arguments,
}

/// Invoke payload: run a command against an existing instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoke {
    /// Contract the instance belongs to
    pub contract_id: String,
    /// Command tag, dispatched by the contract
    pub command: String,
    /// Command arguments
    pub args: Arguments,
}

/// Instruction payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Create a new instance
    Spawn(Spawn),
    /// Mutate or query an existing instance
    Invoke(Invoke),
}

impl Payload {
    /// Contract the payload is addressed to
    pub fn contract_id(&self) -> &str {
        match self {
            Payload::Spawn(spawn) => &spawn.contract_id,
            Payload::Invoke(invoke) => &invoke.contract_id,
        }
    }
}

/// Signature position reserved for one signer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSlot {
    /// Textual identity of the signer expected in this slot
    pub signer: String,
    /// Signature bytes; empty until the signer fills the slot
    pub signature: Vec<u8>,
}

impl SignatureSlot {
    /// Create an empty slot reserved for `signer`
    pub fn reserved(signer: impl Into<String>) -> Self {
        Self {
            signer: signer.into(),
            signature: Vec::new(),
        }
    }

    /// Whether a signature has been written into this slot
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

/// Borrowed view of the signed-over part of an instruction
#[derive(Serialize)]
struct DigestView<'a> {
    instance_id: &'a InstanceId,
    payload: &'a Payload,
    signer_counters: &'a [u64],
    signers: Vec<&'a str>,
}

/// A single ledger operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Target instance (the parent darc instance for spawns)
    pub instance_id: InstanceId,
    /// What to do
    pub payload: Payload,
    /// Replay counters, one per signature slot
    pub signer_counters: Vec<u64>,
    /// Fixed-length signature array
    pub signatures: Vec<SignatureSlot>,
}

impl Instruction {
    /// Create an unsigned spawn instruction
    pub fn spawn(instance_id: InstanceId, contract_id: impl Into<String>, args: Arguments) -> Self {
        Self {
            instance_id,
            payload: Payload::Spawn(Spawn {
                contract_id: contract_id.into(),
                args,
            }),
            signer_counters: Vec::new(),
            signatures: Vec::new(),
        }
    }

    /// Create an unsigned invoke instruction
    pub fn invoke(
        instance_id: InstanceId,
        contract_id: impl Into<String>,
        command: impl Into<String>,
        args: Arguments,
    ) -> Self {
        Self {
            instance_id,
            payload: Payload::Invoke(Invoke {
                contract_id: contract_id.into(),
                command: command.into(),
                args,
            }),
            signer_counters: Vec::new(),
            signatures: Vec::new(),
        }
    }

    /// Digest signers sign over.
    ///
    /// Covers the target, payload, counters and signer identities, but not
    /// the signature bytes.
    pub fn digest(&self) -> Result<Hash32> {
        serialization::hash_canonical(&DigestView {
            instance_id: &self.instance_id,
            payload: &self.payload,
            signer_counters: &self.signer_counters,
            signers: self.signatures.iter().map(|s| s.signer.as_str()).collect(),
        })
    }

    /// Derive the id of an instance created by this instruction
    pub fn derive_id(&self, label: &str) -> Result<InstanceId> {
        let digest = self.digest()?;
        Ok(InstanceId::derive(&digest, label))
    }

    /// Identities of all reserved signers, in slot order
    pub fn signer_identities(&self) -> Vec<&str> {
        self.signatures.iter().map(|s| s.signer.as_str()).collect()
    }
}

/// Ordered list of instructions submitted together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTransaction {
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
}

impl ClientTransaction {
    /// Create a transaction from instructions
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the transaction has no instructions
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Compute the digest of every instruction from the transaction body
    pub fn instruction_digests(&self) -> Result<InstructionDigests> {
        let mut digests = InstructionDigests::new();
        for (index, instruction) in self.instructions.iter().enumerate() {
            digests.insert(index, instruction.digest()?.to_vec());
        }
        Ok(digests)
    }

    /// Encode to canonical bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialization::to_vec(self)
    }

    /// Decode from canonical bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serialization::from_slice(bytes)
    }

    /// Encode to the standard base64 text form used on the wire
    pub fn to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_bytes()?))
    }

    /// Decode from the standard base64 text form used on the wire
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| MedchainError::serialization(format!("Invalid base64 transaction: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

/// Hash of the whole transaction body, ignoring signature bytes
pub fn transaction_hash(transaction: &ClientTransaction) -> Result<Hash32> {
    let mut digests = Vec::with_capacity(transaction.len() * 32);
    for instruction in &transaction.instructions {
        digests.extend_from_slice(&instruction.digest()?);
    }
    Ok(hash::hash(&digests))
}
