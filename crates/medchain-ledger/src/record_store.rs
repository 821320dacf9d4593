//! Query record store
//!
//! The value of a query instance: an ordered list of `(query id, status)`
//! records. Insertion order is preserved and ids are not deduplicated, so
//! several records may share an id. Lookups always take the first match.
//! Statuses are text: an argument value that is not UTF-8 rejects the whole
//! spawn or update before the store changes.

use crate::errors::ContractError;
use medchain_core::{serialization, Argument, Arguments};
use serde::{Deserialize, Serialize};

/// Status that marks a query as approved
pub const APPROVED_STATUS: &str = "Approved";

/// One query and its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Opaque query id
    pub id: String,
    /// Free-form status
    pub status: String,
}

impl QueryRecord {
    /// Create a record
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
        }
    }

    /// Whether the status is the approval sentinel
    pub fn is_approved(&self) -> bool {
        self.status == APPROVED_STATUS
    }
}

/// Ordered collection of query records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStore {
    /// Records in insertion order
    pub records: Vec<QueryRecord>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with the given id
    pub fn find(&self, id: &str) -> Option<&QueryRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Append one record per argument, duplicates included
    pub fn append_all(&mut self, args: &Arguments) -> Result<(), ContractError> {
        let records = args
            .iter()
            .map(|arg| status_of(arg).map(|status| QueryRecord::new(arg.name.clone(), status)))
            .collect::<Result<Vec<_>, ContractError>>()?;
        self.records.extend(records);
        Ok(())
    }

    /// Apply update arguments in order.
    ///
    /// For each argument: an empty value removes the first record with that
    /// id; a non-empty value overwrites the status of every record with that
    /// id; an id with no record is appended, even with an empty value.
    pub fn apply_update(&mut self, args: &Arguments) -> Result<(), ContractError> {
        for arg in args {
            status_of(arg)?;
        }
        for arg in args {
            if arg.value.is_empty() {
                match self.records.iter().position(|record| record.id == arg.name) {
                    Some(index) => {
                        self.records.remove(index);
                    }
                    None => self.records.push(QueryRecord::new(arg.name.clone(), "")),
                }
                continue;
            }

            let status = status_of(arg)?;
            let mut updated = false;
            for record in self.records.iter_mut().filter(|record| record.id == arg.name) {
                status.clone_into(&mut record.status);
                updated = true;
            }
            if !updated {
                self.records.push(QueryRecord::new(arg.name.clone(), status));
            }
        }
        Ok(())
    }

    /// Check the approval of the first argument's query.
    ///
    /// Only the first argument is examined: a missing record or a status
    /// other than [`APPROVED_STATUS`] fails, an approved record succeeds
    /// without looking at the rest. No arguments means success.
    pub fn verify_status(&self, args: &Arguments) -> Result<(), ContractError> {
        let Some(arg) = args.iter().next() else {
            return Ok(());
        };
        match self.find(&arg.name) {
            None => Err(ContractError::RecordNotFound {
                id: arg.name.clone(),
            }),
            Some(record) if record.is_approved() => Ok(()),
            Some(record) => Err(ContractError::NotApproved {
                id: record.id.clone(),
                status: record.status.clone(),
            }),
        }
    }

    /// Encode the store for the host
    pub fn to_bytes(&self) -> Result<Vec<u8>, ContractError> {
        serialization::to_vec(self).map_err(|e| ContractError::Encoding(e.to_string()))
    }

    /// Decode a stored value; an empty blob is an empty store
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContractError> {
        if bytes.is_empty() {
            return Ok(Self::new());
        }
        serialization::from_slice(bytes).map_err(|e| ContractError::Encoding(e.to_string()))
    }
}

fn status_of(arg: &Argument) -> Result<&str, ContractError> {
    arg.value_str().ok_or_else(|| ContractError::InvalidStatus {
        id: arg.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn store(records: &[(&str, &str)]) -> RecordStore {
        RecordStore {
            records: records
                .iter()
                .map(|(id, status)| QueryRecord::new(*id, *status))
                .collect(),
        }
    }

    #[test]
    fn test_append_keeps_duplicates_in_order() {
        let mut s = RecordStore::new();
        s.append_all(&Arguments::from_pairs([("q1", "Requested"), ("q1", "Other")])).unwrap();
        assert_eq!(s, store(&[("q1", "Requested"), ("q1", "Other")]));
    }

    #[test]
    fn test_update_overwrites_every_duplicate() {
        let mut s = store(&[("q1", "A"), ("q2", "B"), ("q1", "C")]);
        s.apply_update(&Arguments::from_pairs([("q1", "Approved")])).unwrap();
        assert_eq!(s, store(&[("q1", "Approved"), ("q2", "B"), ("q1", "Approved")]));
    }

    #[test]
    fn test_update_empty_value_removes_first_match_only() {
        let mut s = store(&[("q1", "A"), ("q2", "B"), ("q1", "C")]);
        s.apply_update(&Arguments::from_pairs([("q1", "")])).unwrap();
        assert_eq!(s, store(&[("q2", "B"), ("q1", "C")]));
    }

    #[test]
    fn test_update_unknown_id_appends_even_when_empty() {
        let mut s = store(&[("q1", "A")]);
        s.apply_update(&Arguments::from_pairs([("q2", ""), ("q3", "Requested")])).unwrap();
        assert_eq!(s, store(&[("q1", "A"), ("q2", ""), ("q3", "Requested")]));
    }

    #[test]
    fn test_update_arguments_apply_in_order() {
        let mut s = RecordStore::new();
        s.apply_update(&Arguments::from_pairs([("q1", "A"), ("q1", "B"), ("q1", "")])).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_non_utf8_status_is_rejected_without_changes() {
        let bad = Arguments(vec![
            Argument::new("q1", "Approved"),
            Argument::new("q2", vec![0xff, 0xfe]),
        ]);

        let mut s = store(&[("q1", "Requested")]);
        assert_matches!(
            s.apply_update(&bad),
            Err(ContractError::InvalidStatus { id }) if id == "q2"
        );
        assert_eq!(s, store(&[("q1", "Requested")]));

        assert_matches!(s.append_all(&bad), Err(ContractError::InvalidStatus { .. }));
        assert_eq!(s, store(&[("q1", "Requested")]));
    }

    #[test]
    fn test_verify_status_first_argument_decides() {
        let s = store(&[("q1", "Approved"), ("q2", "Requested")]);

        assert_eq!(s.verify_status(&Arguments::from_pairs([("q1", "")])), Ok(()));
        assert_eq!(
            s.verify_status(&Arguments::from_pairs([("q1", ""), ("missing", "")])),
            Ok(())
        );
        assert_matches!(
            s.verify_status(&Arguments::from_pairs([("q2", ""), ("q1", "")])),
            Err(ContractError::NotApproved { id, status }) if id == "q2" && status == "Requested"
        );
        assert_matches!(
            s.verify_status(&Arguments::from_pairs([("q9", ""), ("q1", "")])),
            Err(ContractError::RecordNotFound { id }) if id == "q9"
        );
        assert_eq!(s.verify_status(&Arguments::new()), Ok(()));
    }

    #[test]
    fn test_verify_status_uses_first_duplicate() {
        let s = store(&[("q1", "Rejected"), ("q1", "Approved")]);
        assert_matches!(
            s.verify_status(&Arguments::from_pairs([("q1", "")])),
            Err(ContractError::NotApproved { .. })
        );
    }

    #[test]
    fn test_empty_blob_decodes_to_empty_store() {
        assert_eq!(RecordStore::from_bytes(&[]).unwrap(), RecordStore::new());
    }

    #[test]
    fn test_encoding_roundtrip_and_garbage() {
        let s = store(&[("q1", "Approved"), ("q1", "")]);
        assert_eq!(RecordStore::from_bytes(&s.to_bytes().unwrap()).unwrap(), s);
        assert_matches!(
            RecordStore::from_bytes(&[0xff; 3]),
            Err(ContractError::Encoding(_))
        );
    }
}
