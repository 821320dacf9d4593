//! Pure synchronous hashing
//!
//! Hashing is deterministic and needs no host involvement, so it lives here as
//! plain functions rather than behind the effect interface. Every digest in
//! the system (instruction digests, derived instance ids) goes through this
//! module so the algorithm is chosen in exactly one place.
//!
//! Current algorithm: **SHA-256** (32-byte output)

use sha2::{Digest, Sha256};

/// 32-byte digest produced by [`hash`]
pub type Hash32 = [u8; 32];

/// Hash arbitrary bytes to a 32-byte digest
pub fn hash(data: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash several chunks as if they were concatenated
pub fn hash_chunks(chunks: &[&[u8]]) -> Hash32 {
    let mut hasher = Sha256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}
