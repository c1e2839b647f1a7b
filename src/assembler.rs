//! Attaching unlocking scripts and producing the broadcastable hex

use crate::constants::{UNCOMPRESSED_PUBKEY_PREFIX, UNCOMPRESSED_PUBKEY_SIZE};
use crate::ecdsa::{sign_hash, verify};
use crate::error::{Result, SignerError};
use crate::keys::PrivateKey;
use crate::script::p2pkh_unlocking_script;
use crate::serialization::serialize_transaction;
use crate::sighash::{compute_sighash, SighashType};
use crate::types::*;

/// Material for one input's unlocking script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSignature {
    /// DER signature followed by the hash-type byte
    pub der_with_hashtype: ByteString,
    /// Uncompressed public key
    pub public_key: ByteString,
}

/// SignInput: 𝒯𝒳 × ℕ × 𝔹³² × 𝕊 × ℕ → 𝔹* × 𝔹⁶⁵
///
/// Hashes input `input_index` against `script_code`, signs with the
/// deterministic nonce and checks the result against libsecp256k1 before
/// handing it out.
pub fn sign_input(
    tx: &Transaction,
    input_index: usize,
    private_key: &PrivateKey,
    script_code: &[u8],
    sighash_type: SighashType,
) -> Result<InputSignature> {
    let sighash = compute_sighash(tx, input_index, script_code, sighash_type)?;
    let signature = sign_hash(private_key, &sighash)?;
    let public_key = private_key.public_key();

    if !verify(&public_key, &sighash, &signature)? {
        return Err(SignerError::InvalidSignature(format!(
            "signature for input {} failed verification",
            input_index
        )));
    }
    tracing::trace!("Signed input {} sighash {}", input_index, hex::encode(sighash));

    Ok(InputSignature {
        der_with_hashtype: signature.to_der_with_hashtype(sighash_type),
        public_key: public_key.serialize_uncompressed().to_vec(),
    })
}

/// AttachAndFinalize: 𝒯𝒳 × (𝔹* × 𝔹*)* → hex
///
/// script_sig(i) = Push(sig_i) ‖ Push(pubkey_i). The transaction is consumed;
/// on error nothing is returned.
pub fn attach_and_finalize(tx: Transaction, signatures: &[InputSignature]) -> Result<String> {
    let signed = attach_signatures(tx, signatures)?;
    Ok(hex::encode(serialize_transaction(&signed)?))
}

/// Replace every input's unlocking script, returning the signed transaction
pub fn attach_signatures(
    mut tx: Transaction,
    signatures: &[InputSignature],
) -> Result<Transaction> {
    if signatures.len() != tx.inputs.len() {
        return Err(SignerError::Serialization(format!(
            "{} signatures for {} inputs",
            signatures.len(),
            tx.inputs.len()
        )));
    }

    for (i, (input, signature)) in tx.inputs.iter_mut().zip(signatures).enumerate() {
        let key = &signature.public_key;
        if key.len() != UNCOMPRESSED_PUBKEY_SIZE || key[0] != UNCOMPRESSED_PUBKEY_PREFIX {
            return Err(SignerError::Serialization(format!(
                "input {} public key is not an uncompressed point",
                i
            )));
        }
        input.script_sig = p2pkh_unlocking_script(&signature.der_with_hashtype, key)?;
    }
    Ok(tx)
}
