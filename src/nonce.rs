//! Deterministic nonce derivation
//!
//! RFC6979-style two-round iteration keyed with Keccak-256:
//!
//! ```text
//! V = 0x01 ‖ 0x00³¹        K = 0x00³²
//! K = H(K ‖ V ‖ 0x00 ‖ x ‖ h)    V = H(K ‖ V)
//! K = H(K ‖ V ‖ 0x01 ‖ x ‖ h)    V = H(K ‖ V)
//! k = (int(V) mod (n − 1)) + 1
//! ```
//!
//! Identical (x, h) pairs always give the same k.

use crate::constants::CURVE_ORDER;
use crate::error::{Result, SignerError};
use crate::keys::PrivateKey;
use crate::types::Hash;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Per-signature secret k ∈ [1, n − 1], big-endian
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce([u8; 32]);

impl Nonce {
    /// Accept a 32-byte big-endian value already in [1, n − 1]
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        let value = BigUint::from_bytes_be(&bytes);
        if value.is_zero() || value >= BigUint::from_bytes_be(&CURVE_ORDER) {
            return Err(SignerError::InvalidNonce(
                "nonce must lie in [1, n - 1]".to_string(),
            ));
        }
        Ok(Self(bytes))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nonce(<redacted>)")
    }
}

fn keccak(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// DeriveNonce: 𝔹³² × ℍ → [1, n − 1]
pub fn derive_nonce(private_key: &PrivateKey, message_hash: &Hash) -> Result<Nonce> {
    derive_nonce_from_bytes(&private_key.to_bytes(), message_hash)
}

/// Same as `derive_nonce` over raw key bytes.
///
/// Key bytes outside [1, n − 1] give `InvalidKey`. The reduction
/// `mod (n − 1) + 1` cannot produce zero; the range check on the result
/// still reports `InvalidNonce` rather than signing with an out-of-range value.
pub fn derive_nonce_from_bytes(private_key: &[u8; 32], message_hash: &Hash) -> Result<Nonce> {
    PrivateKey::from_bytes(private_key)?;

    let mut v = [0u8; 32];
    v[0] = 0x01;
    let mut k = [0u8; 32];

    k = keccak(&[&k, &v, &[0x00u8], private_key, message_hash]);
    v = keccak(&[&k, &v]);
    k = keccak(&[&k, &v, &[0x01u8], private_key, message_hash]);
    v = keccak(&[&k, &v]);

    let order = BigUint::from_bytes_be(&CURVE_ORDER);
    let candidate = BigUint::from_bytes_be(&v);
    let reduced = candidate % (&order - BigUint::one()) + BigUint::one();

    let mut bytes = [0u8; 32];
    let be = reduced.to_bytes_be();
    bytes[32 - be.len()..].copy_from_slice(&be);
    Nonce::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_key() -> PrivateKey {
        PrivateKey::from_hex("0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d")
            .unwrap()
    }

    #[test]
    fn test_keccak_empty_vector() {
        assert_eq!(
            hex::encode(keccak(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_nonce_golden_zero_hash() {
        let nonce = derive_nonce(&reference_key(), &[0u8; 32]).unwrap();
        assert_eq!(
            hex::encode(nonce.to_bytes()),
            "997066f4e96280c7c907bbdd50d8ae46481270791117cc57c9955e4e4dd50232"
        );
    }

    #[test]
    fn test_nonce_is_deterministic() {
        let hash = [0x5a; 32];
        let a = derive_nonce(&reference_key(), &hash).unwrap();
        let b = derive_nonce(&reference_key(), &hash).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonce_depends_on_message() {
        let a = derive_nonce(&reference_key(), &[0x01; 32]).unwrap();
        let b = derive_nonce(&reference_key(), &[0x02; 32]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_raw_key_must_be_valid_scalar() {
        let hash = [0x11; 32];
        assert!(matches!(
            derive_nonce_from_bytes(&[0u8; 32], &hash),
            Err(SignerError::InvalidKey(_))
        ));
        assert!(matches!(
            derive_nonce_from_bytes(&CURVE_ORDER, &hash),
            Err(SignerError::InvalidKey(_))
        ));
        assert!(matches!(
            derive_nonce_from_bytes(&[0xff; 32], &hash),
            Err(SignerError::InvalidKey(_))
        ));

        let key = reference_key();
        assert_eq!(
            derive_nonce_from_bytes(&key.to_bytes(), &hash).unwrap(),
            derive_nonce(&key, &hash).unwrap()
        );
    }

    #[test]
    fn test_nonce_range_check() {
        assert!(matches!(Nonce::from_bytes([0u8; 32]), Err(SignerError::InvalidNonce(_))));
        assert!(matches!(Nonce::from_bytes(CURVE_ORDER), Err(SignerError::InvalidNonce(_))));
    }

    #[test]
    fn test_debug_redacts_nonce() {
        let nonce = derive_nonce(&reference_key(), &[0u8; 32]).unwrap();
        assert_eq!(format!("{:?}", nonce), "Nonce(<redacted>)");
    }
}
