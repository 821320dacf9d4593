//! Local signers
//!
//! A signer owns secret key material and produces signatures over opaque
//! digests. The co-signing engine only needs the [`Signer`] trait; the
//! Ed25519 implementation below is what the signing service loads from a
//! request's key pair.

use crate::identity::SignerIdentity;
use crate::{CoSignError, Result};
use ed25519_dalek::{Signer as _, SigningKey};
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

/// Something that can sign digests on behalf of one identity
pub trait Signer {
    /// Public identity of this signer
    fn identity(&self) -> SignerIdentity;

    /// Sign an opaque digest
    fn sign(&self, digest: &[u8]) -> Result<Vec<u8>>;
}

/// Ed25519 signer backed by an in-memory secret key.
///
/// The secret key is zeroized on drop and never shown in `Debug` output.
#[derive(Clone)]
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Create from a 32-byte secret seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Generate a fresh key pair
    pub fn generate<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Self {
        Self {
            signing_key: SigningKey::generate(rng),
        }
    }

    /// Load a signer from raw public and private key bytes.
    ///
    /// The private key is required. When the public key is non-empty it must
    /// match the one derived from the private key.
    pub fn from_bytes_with_err(public_key: &[u8], private_key: &[u8]) -> Result<Self> {
        if private_key.is_empty() {
            return Err(CoSignError::InvalidKey(
                "a private key is required to sign".to_string(),
            ));
        }
        let seed: Zeroizing<[u8; 32]> =
            Zeroizing::new(private_key.try_into().map_err(|_| {
                CoSignError::InvalidKey(format!(
                    "private key must be 32 bytes, got {}",
                    private_key.len()
                ))
            })?);
        let signer = Self::from_seed(&seed);

        if !public_key.is_empty() {
            let expected = SignerIdentity::from_public_bytes(public_key)?;
            if expected != signer.identity() {
                return Err(CoSignError::InvalidKey(
                    "public key does not match the private key".to_string(),
                ));
            }
        }
        Ok(signer)
    }

    /// Load a signer from hex-encoded public and private keys
    pub fn from_hex(public_key: &str, private_key: &str) -> Result<Self> {
        let public = hex::decode(public_key.trim())
            .map_err(|e| CoSignError::InvalidKey(format!("public key is not hex: {e}")))?;
        let private = Zeroizing::new(
            hex::decode(private_key.trim())
                .map_err(|e| CoSignError::InvalidKey(format!("private key is not hex: {e}")))?,
        );
        Self::from_bytes_with_err(&public, &private)
    }

    /// Hex-encoded public key
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().as_bytes())
    }

    /// Hex-encoded private key.
    ///
    /// Handle with care - this is secret key material.
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.signing_key.to_bytes()))
    }
}

impl Signer for Ed25519Signer {
    fn identity(&self) -> SignerIdentity {
        SignerIdentity::new(self.signing_key.verifying_key())
    }

    fn sign(&self, digest: &[u8]) -> Result<Vec<u8>> {
        let signature = self
            .signing_key
            .try_sign(digest)
            .map_err(|e| CoSignError::Signing(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("signing_key", &"[REDACTED]")
            .field("identity", &self.identity().to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_sign_is_deterministic_and_verifies() {
        let signer = Ed25519Signer::from_seed(&[9u8; 32]);
        let first = signer.sign(b"digest").unwrap();
        let second = signer.sign(b"digest").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(signer.identity().verify(b"digest", &first));
    }

    #[test]
    fn test_generated_keys_are_distinct() {
        let mut rng = rand::rngs::OsRng;
        let a = Ed25519Signer::generate(&mut rng);
        let b = Ed25519Signer::generate(&mut rng);
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn test_hex_roundtrip() {
        let signer = Ed25519Signer::from_seed(&[1u8; 32]);
        let loaded = Ed25519Signer::from_hex(&signer.public_key_hex(), &signer.private_key_hex())
            .unwrap();
        assert_eq!(loaded.identity(), signer.identity());
    }

    #[test]
    fn test_public_key_is_optional() {
        let signer = Ed25519Signer::from_seed(&[2u8; 32]);
        let loaded = Ed25519Signer::from_hex("", &signer.private_key_hex()).unwrap();
        assert_eq!(loaded.identity(), signer.identity());
    }

    #[test]
    fn test_mismatched_public_key_is_rejected() {
        let signer = Ed25519Signer::from_seed(&[2u8; 32]);
        let other = Ed25519Signer::from_seed(&[4u8; 32]);
        let err = Ed25519Signer::from_hex(&other.public_key_hex(), &signer.private_key_hex())
            .unwrap_err();
        assert_matches!(err, CoSignError::InvalidKey(_));
    }

    #[test]
    fn test_missing_private_key_is_rejected() {
        let signer = Ed25519Signer::from_seed(&[2u8; 32]);
        assert!(Ed25519Signer::from_hex(&signer.public_key_hex(), "").is_err());
        assert!(Ed25519Signer::from_bytes_with_err(&[], &[0u8; 31]).is_err());
    }

    #[test]
    fn test_debug_redacts_signing_key() {
        let signer = Ed25519Signer::from_seed(&[7u8; 32]);
        let debug_str = format!("{signer:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains(&*signer.private_key_hex()));
    }
}
