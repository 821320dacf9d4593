//! Serde helpers for wire encodings
//!
//! Digests travel as standard base64 strings keyed by instruction index.
//!
//! ```ignore
//! use medchain_messages::serde::digests_base64;
//!
//! #[derive(Serialize, Deserialize)]
//! struct MyType {
//!     #[serde(with = "digests_base64")]
//!     instruction_digests: InstructionDigests,
//! }
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serializer};

/// Serde module for instruction digests: index keys, base64 values
pub mod digests_base64 {
    use super::*;
    use medchain_core::InstructionDigests;
    use serde::ser::SerializeMap;
    use std::collections::BTreeMap;

    /// Serialize digests as `{"<index>": "<base64>"}`
    pub fn serialize<S>(digests: &InstructionDigests, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(digests.len()))?;
        for (index, digest) in digests {
            map.serialize_entry(index, &STANDARD.encode(digest))?;
        }
        map.end()
    }

    /// Deserialize digests from `{"<index>": "<base64>"}`
    pub fn deserialize<'de, D>(deserializer: D) -> Result<InstructionDigests, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = BTreeMap::<usize, String>::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(index, digest)| {
                STANDARD
                    .decode(digest)
                    .map(|bytes| (index, bytes))
                    .map_err(|e| {
                        serde::de::Error::custom(format!("digest {index} is not base64: {e}"))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use medchain_core::InstructionDigests;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super::digests_base64")]
        digests: InstructionDigests,
    }

    #[test]
    fn test_digest_map_json_shape() {
        let mut digests = InstructionDigests::new();
        digests.insert(0, vec![0xde, 0xad]);
        digests.insert(1, vec![0xbe, 0xef]);
        let wrapper = Wrapper { digests };

        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"digests":{"0":"3q0=","1":"vu8="}}"#);
        assert_eq!(serde_json::from_str::<Wrapper>(&json).unwrap(), wrapper);
    }

    #[test]
    fn test_bad_digest_is_rejected() {
        let err = serde_json::from_str::<Wrapper>(r#"{"digests":{"0":"!!"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("digest 0 is not base64"));
    }
}
