//! Signer roster
//!
//! Maps each signer identity to its fixed position in every instruction's
//! signature array. The same roster is shared by all instructions of a
//! transaction and by every signer taking part in the round.

use crate::{CoSignError, Result};
use medchain_core::SignatureSlot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity string to signature slot index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignerRoster(BTreeMap<String, usize>);

impl SignerRoster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Assign slots in the order the identities are given
    pub fn from_identities<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            identities
                .into_iter()
                .enumerate()
                .map(|(slot, identity)| (identity.into(), slot))
                .collect(),
        )
    }

    /// Set the slot of an identity, returning the previous slot if any
    pub fn insert(&mut self, identity: impl Into<String>, slot: usize) -> Option<usize> {
        self.0.insert(identity.into(), slot)
    }

    /// Slot index of an identity
    pub fn slot_of(&self, identity: &str) -> Option<usize> {
        self.0.get(identity).copied()
    }

    /// Number of signers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(identity, slot)` pairs in identity order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(identity, slot)| (identity.as_str(), *slot))
    }

    /// Identities ordered by slot index.
    ///
    /// Fails unless the slots are exactly `0..len` with no duplicates.
    pub fn ordered_identities(&self) -> Result<Vec<&str>> {
        let mut ordered: Vec<Option<&str>> = vec![None; self.0.len()];
        for (identity, slot) in &self.0 {
            let entry = ordered.get_mut(*slot).ok_or_else(|| {
                CoSignError::InvalidRoster(format!(
                    "slot {slot} of {identity} exceeds roster size {}",
                    self.0.len()
                ))
            })?;
            if let Some(previous) = entry.replace(identity.as_str()) {
                return Err(CoSignError::InvalidRoster(format!(
                    "slot {slot} is assigned to both {previous} and {identity}"
                )));
            }
        }
        // Dense and duplicate-free implies every entry is filled.
        Ok(ordered.into_iter().flatten().collect())
    }

    /// Empty signature slots laid out in roster order
    pub fn reserved_slots(&self) -> Result<Vec<SignatureSlot>> {
        Ok(self
            .ordered_identities()?
            .into_iter()
            .map(SignatureSlot::reserved)
            .collect())
    }
}

impl FromIterator<(String, usize)> for SignerRoster {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, usize>> for SignerRoster {
    fn from(map: BTreeMap<String, usize>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_identities_assigns_in_order() {
        let roster = SignerRoster::from_identities(["ed25519:bb", "ed25519:aa"]);
        assert_eq!(roster.slot_of("ed25519:bb"), Some(0));
        assert_eq!(roster.slot_of("ed25519:aa"), Some(1));
        assert_eq!(roster.slot_of("ed25519:cc"), None);
        assert_eq!(
            roster.ordered_identities().unwrap(),
            vec!["ed25519:bb", "ed25519:aa"]
        );
    }

    #[test]
    fn test_reserved_slots_follow_slot_order() {
        let roster = SignerRoster::from_identities(["x", "y", "z"]);
        let slots = roster.reserved_slots().unwrap();
        assert_eq!(
            slots.iter().map(|s| s.signer.as_str()).collect::<Vec<_>>(),
            vec!["x", "y", "z"]
        );
        assert!(slots.iter().all(|s| !s.is_signed()));
    }

    #[test]
    fn test_sparse_roster_is_invalid() {
        let mut roster = SignerRoster::new();
        roster.insert("a", 0);
        roster.insert("b", 2);
        assert!(matches!(
            roster.ordered_identities(),
            Err(CoSignError::InvalidRoster(_))
        ));
    }

    #[test]
    fn test_duplicate_slot_is_invalid() {
        let mut roster = SignerRoster::new();
        roster.insert("a", 1);
        roster.insert("b", 1);
        assert!(roster.reserved_slots().is_err());
    }

    #[test]
    fn test_json_shape_is_plain_map() {
        let roster = SignerRoster::from_identities(["ed25519:aa"]);
        let json = serde_json::to_string(&roster).unwrap();
        assert_eq!(json, r#"{"ed25519:aa":0}"#);
        let parsed: SignerRoster = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, roster);
    }
}
