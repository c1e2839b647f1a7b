//! Key material: private scalar, uncompressed public point, address

use crate::address::Address;
use crate::constants::*;
use crate::error::{Result, SignerError};
use crate::types::Network;
use secp256k1::{Secp256k1, SecretKey};
use std::fmt;

/// Private key: d ∈ [1, n − 1]
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    /// Parse a 32-byte big-endian scalar.
    ///
    /// Fails with `InvalidKey` if the slice is not 32 bytes, is zero, or is
    /// not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(SignerError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let secret = SecretKey::from_slice(bytes).map_err(|_| {
            SignerError::InvalidKey("scalar is zero or not below curve order".to_string())
        })?;
        Ok(Self { secret })
    }

    /// Parse a hex scalar, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed)
            .map_err(|e| SignerError::InvalidKey(format!("bad hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Big-endian scalar bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        let secp = Secp256k1::signing_only();
        PublicKey {
            inner: secp256k1::PublicKey::from_secret_key(&secp, &self.secret),
        }
    }

    pub fn address(&self, network: Network) -> Address {
        Address::from_public_key(&self.public_key(), network)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Public key: P = d·G, always derived from a `PrivateKey`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    inner: secp256k1::PublicKey,
}

impl PublicKey {
    /// 0x04 ‖ X ‖ Y
    pub fn serialize_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBKEY_SIZE] {
        self.inner.serialize_uncompressed()
    }

    pub(crate) fn as_secp(&self) -> &secp256k1::PublicKey {
        &self.inner
    }
}

/// Derive: d → (d·G, Address(d·G))
pub fn derive(private_key: &PrivateKey, network: Network) -> (PublicKey, Address) {
    let public_key = private_key.public_key();
    let address = Address::from_public_key(&public_key, network);
    (public_key, address)
}
