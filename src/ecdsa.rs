//! ECDSA over secp256k1 with explicit scalar arithmetic
//!
//! Sign(d, z, k):
//! 1. R = k·G, r = R.x mod n, r ≠ 0
//! 2. s = k⁻¹ (z + r·d) mod n, s ≠ 0
//! 3. s > n/2 ⇒ s = n − s
//!
//! Only the point multiplication k·G is delegated to libsecp256k1; the
//! scalar arithmetic mod n is done here. `verify` checks a result against
//! libsecp256k1's own verifier.

use crate::constants::*;
use crate::error::{Result, SignerError};
use crate::keys::{PrivateKey, PublicKey};
use crate::nonce::{derive_nonce, Nonce};
use crate::sighash::SighashType;
use crate::types::{ByteString, Hash};
use num_bigint::BigUint;
use num_traits::Zero;
use secp256k1::{Message, Secp256k1, SecretKey};

/// Signature (r, s) with r, s ∈ [1, n − 1], big-endian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

fn curve_order() -> BigUint {
    BigUint::from_bytes_be(&CURVE_ORDER)
}

fn to_fixed(value: &BigUint) -> [u8; 32] {
    let be = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - be.len()..].copy_from_slice(&be);
    out
}

/// Modular inverse in the prime field of order n: a⁻¹ = a^(n−2) mod n
fn inverse_mod_order(a: &BigUint, order: &BigUint) -> BigUint {
    a.modpow(&(order.clone() - 2u32), order)
}

impl Signature {
    /// Build from raw components, requiring 1 ≤ r, s ≤ n − 1
    pub fn from_scalars(r: [u8; 32], s: [u8; 32]) -> Result<Self> {
        let order = curve_order();
        for (name, value) in [("r", &r), ("s", &s)] {
            let v = BigUint::from_bytes_be(value);
            if v.is_zero() {
                return Err(SignerError::InvalidSignature(format!("{} is zero", name)));
            }
            if v >= order {
                return Err(SignerError::InvalidSignature(format!(
                    "{} is not below curve order",
                    name
                )));
            }
        }
        Ok(Self { r, s })
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// s ≤ ⌊n/2⌋
    pub fn is_low_s(&self) -> bool {
        self.s <= HALF_CURVE_ORDER
    }

    /// Copy with s replaced by n − s when s > n/2
    pub fn normalize_s(&self) -> Self {
        if self.is_low_s() {
            return *self;
        }
        let s = curve_order() - BigUint::from_bytes_be(&self.s);
        Self { r: self.r, s: to_fixed(&s) }
    }

    /// 0x30 len 0x02 len(r) r 0x02 len(s) s
    pub fn to_der(&self) -> ByteString {
        let rb = canonicalize_int(&self.r);
        let sb = canonicalize_int(&self.s);

        let mut out = Vec::with_capacity(6 + rb.len() + sb.len());
        out.push(0x30);
        out.push((4 + rb.len() + sb.len()) as u8);
        out.push(0x02);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(0x02);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// DER encoding followed by the one-byte hash type
    pub fn to_der_with_hashtype(&self, sighash_type: SighashType) -> ByteString {
        let mut out = self.to_der();
        out.push(sighash_type.as_byte());
        out
    }

    /// Strict DER parse of a signature without hash-type suffix
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let malformed =
            |what: &str| SignerError::InvalidSignature(format!("malformed DER: {}", what));

        if bytes.len() < 8 || bytes.len() > 72 {
            return Err(malformed("bad total length"));
        }
        if bytes[0] != 0x30 {
            return Err(malformed("missing sequence tag"));
        }
        if bytes[1] as usize != bytes.len() - 2 {
            return Err(malformed("sequence length mismatch"));
        }

        let (r, rest) = parse_der_int(&bytes[2..]).ok_or_else(|| malformed("bad r"))?;
        let (s, rest) = parse_der_int(rest).ok_or_else(|| malformed("bad s"))?;
        if !rest.is_empty() {
            return Err(malformed("trailing bytes"));
        }

        Self::from_scalars(r, s)
    }
}

/// Minimal big-endian encoding, with 0x00 prepended when the high bit is set
fn canonicalize_int(value: &[u8; 32]) -> Vec<u8> {
    let first = value.iter().position(|&b| b != 0).unwrap_or(31);
    let mut out = Vec::with_capacity(33);
    if value[first] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(&value[first..]);
    out
}

/// 0x02 len value, rejecting negative and non-minimal encodings
fn parse_der_int(data: &[u8]) -> Option<([u8; 32], &[u8])> {
    if data.len() < 2 || data[0] != 0x02 {
        return None;
    }
    let len = data[1] as usize;
    if len == 0 || data.len() < 2 + len {
        return None;
    }
    let value = &data[2..2 + len];
    if value[0] & 0x80 != 0 {
        return None;
    }
    if len > 1 && value[0] == 0x00 && value[1] & 0x80 == 0 {
        return None;
    }

    let stripped = if value[0] == 0x00 { &value[1..] } else { value };
    if stripped.len() > 32 {
        return None;
    }
    let mut out = [0u8; 32];
    out[32 - stripped.len()..].copy_from_slice(stripped);
    Some((out, &data[2 + len..]))
}

/// Sign: 𝔹³² × ℍ × [1, n − 1] → (r, s)
pub fn sign(private_key: &PrivateKey, message_hash: &Hash, nonce: &Nonce) -> Result<Signature> {
    let order = curve_order();

    // R = k·G
    let k_secret = SecretKey::from_slice(&nonce.to_bytes())
        .map_err(|_| SignerError::InvalidNonce("nonce is not a valid scalar".to_string()))?;
    let secp = Secp256k1::signing_only();
    let point = secp256k1::PublicKey::from_secret_key(&secp, &k_secret).serialize_uncompressed();

    let r = BigUint::from_bytes_be(&point[1..33]) % &order;
    if r.is_zero() {
        return Err(SignerError::InvalidSignature("r is zero".to_string()));
    }

    let k = BigUint::from_bytes_be(&nonce.to_bytes());
    let d = BigUint::from_bytes_be(&private_key.to_bytes());
    let z = BigUint::from_bytes_be(message_hash);

    let k_inv = inverse_mod_order(&k, &order);
    let s = (k_inv * ((z + &r * d) % &order)) % &order;
    if s.is_zero() {
        return Err(SignerError::InvalidSignature("s is zero".to_string()));
    }

    let signature = Signature {
        r: to_fixed(&r),
        s: to_fixed(&s),
    };
    Ok(signature.normalize_s())
}

/// Sign with the deterministic nonce for (d, z)
pub fn sign_hash(private_key: &PrivateKey, message_hash: &Hash) -> Result<Signature> {
    let nonce = derive_nonce(private_key, message_hash)?;
    sign(private_key, message_hash, &nonce)
}

/// Verify with libsecp256k1
pub fn verify(public_key: &PublicKey, message_hash: &Hash, signature: &Signature) -> Result<bool> {
    let secp = Secp256k1::verification_only();
    let message = Message::from_digest_slice(message_hash)
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
    let parsed = secp256k1::ecdsa::Signature::from_der(&signature.to_der())
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
    Ok(secp.verify_ecdsa(&message, &parsed, public_key.as_secp()).is_ok())
}
