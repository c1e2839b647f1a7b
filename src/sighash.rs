//! Legacy (pre-segwit) signature hash
//!
//! SigHash(tx, i, sc, t) = SHA256d(Serialize(tx′) ‖ t:4 LE)
//!
//! where tx′ is a copy of tx in which input i carries the script code sc
//! (OP_CODESEPARATORs removed) and every other input carries an empty script,
//! with further pruning of inputs and outputs according to the hash type.

use crate::error::{Result, SignerError};
use crate::hashes::double_sha256;
use crate::script::remove_code_separators;
use crate::serialization::write_transaction;
use crate::types::*;
use byteorder::{LittleEndian, WriteBytesExt};
use serde::{Deserialize, Serialize};

/// Hash-type marker appended to the preimage and to each signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SighashType(pub u32);

impl SighashType {
    pub const ALL: SighashType = SighashType(0x01);
    pub const NONE: SighashType = SighashType(0x02);
    pub const SINGLE: SighashType = SighashType(0x03);
    pub const ANYONECANPAY: u32 = 0x80;

    pub fn base(self) -> u32 {
        self.0 & 0x1f
    }

    pub fn anyone_can_pay(self) -> bool {
        self.0 & Self::ANYONECANPAY != 0
    }

    pub fn with_anyone_can_pay(self) -> SighashType {
        SighashType(self.0 | Self::ANYONECANPAY)
    }

    /// Byte appended to a DER signature
    pub fn as_byte(self) -> u8 {
        self.0 as u8
    }
}

impl Default for SighashType {
    fn default() -> Self {
        SighashType::ALL
    }
}

/// Digest returned for SIGHASH_SINGLE when the input has no matching output
pub const SIGHASH_SINGLE_BUG: Hash = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

/// Exact bytes that are double-hashed for input `input_index`.
///
/// Fails with `Serialization` if the index is out of range, or for
/// SIGHASH_SINGLE without a matching output (no preimage exists then).
pub fn sighash_preimage(
    tx: &Transaction,
    input_index: usize,
    script_override: &[u8],
    sighash_type: SighashType,
) -> Result<Vec<u8>> {
    if input_index >= tx.inputs.len() {
        return Err(SignerError::Serialization(format!(
            "input index {} out of range ({} inputs)",
            input_index,
            tx.inputs.len()
        )));
    }

    let base = sighash_type.base();
    if base == SighashType::SINGLE.0 && input_index >= tx.outputs.len() {
        return Err(SignerError::Serialization(format!(
            "SIGHASH_SINGLE input {} has no matching output",
            input_index
        )));
    }

    let script_code = remove_code_separators(script_override)?;
    let prune_sequences = base == SighashType::NONE.0 || base == SighashType::SINGLE.0;

    let mut inputs = Vec::with_capacity(tx.inputs.len());
    for (i, input) in tx.inputs.iter().enumerate() {
        if sighash_type.anyone_can_pay() && i != input_index {
            continue;
        }
        let signed = i == input_index;
        inputs.push(TransactionInput {
            prevout: input.prevout.clone(),
            script_sig: if signed { script_code.clone() } else { Vec::new() },
            sequence: if !signed && prune_sequences { 0 } else { input.sequence },
        });
    }

    let outputs = if base == SighashType::NONE.0 {
        Vec::new()
    } else if base == SighashType::SINGLE.0 {
        let mut outputs: Vec<TransactionOutput> = (0..input_index)
            .map(|_| TransactionOutput {
                value: -1,
                script_pubkey: Vec::new(),
            })
            .collect();
        outputs.push(tx.outputs[input_index].clone());
        outputs
    } else {
        tx.outputs.clone()
    };

    let stripped = Transaction {
        version: tx.version,
        inputs,
        outputs,
        lock_time: tx.lock_time,
    };

    let mut preimage = Vec::new();
    write_transaction(&mut preimage, &stripped)?;
    preimage.write_u32::<LittleEndian>(sighash_type.0)?;
    Ok(preimage)
}

/// ComputeSighash: 𝒯𝒳 × ℕ × 𝕊 × ℕ → ℍ
///
/// The transaction passed in is never modified; the script substitution
/// happens on a local copy.
pub fn compute_sighash(
    tx: &Transaction,
    input_index: usize,
    script_override: &[u8],
    sighash_type: SighashType,
) -> Result<Hash> {
    if sighash_type.base() == SighashType::SINGLE.0
        && input_index < tx.inputs.len()
        && input_index >= tx.outputs.len()
    {
        return Ok(SIGHASH_SINGLE_BUG);
    }

    let preimage = sighash_preimage(tx, input_index, script_override, sighash_type)?;
    Ok(double_sha256(&preimage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::p2pkh_script;

    fn two_input_transaction() -> Transaction {
        let mut tx = Transaction::new();
        tx.add_input(OutPoint { hash: [1; 32], index: 0 })
            .add_input(OutPoint { hash: [2; 32], index: 1 })
            .add_output(1000, p2pkh_script(&[0xaa; 20]))
            .add_output(2000, p2pkh_script(&[0xbb; 20]));
        tx.inputs[1].script_sig = vec![0x51, 0x52];
        tx
    }

    #[test]
    fn test_preimage_substitutes_only_signed_input() {
        let tx = two_input_transaction();
        let script = p2pkh_script(&[0xcc; 20]);
        let preimage = sighash_preimage(&tx, 0, &script, SighashType::ALL).unwrap();

        let mut expected_tx = tx.clone();
        expected_tx.inputs[0].script_sig = script.clone();
        expected_tx.inputs[1].script_sig = vec![];
        let mut expected = expected_tx.serialize().unwrap();
        expected.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]);

        assert_eq!(preimage, expected);
    }

    #[test]
    fn test_original_transaction_untouched() {
        let tx = two_input_transaction();
        let before = tx.clone();
        compute_sighash(&tx, 0, &p2pkh_script(&[0xcc; 20]), SighashType::ALL).unwrap();
        assert_eq!(tx, before);
    }

    #[test]
    fn test_inputs_hash_differently() {
        let tx = two_input_transaction();
        let script = p2pkh_script(&[0xcc; 20]);
        let h0 = compute_sighash(&tx, 0, &script, SighashType::ALL).unwrap();
        let h1 = compute_sighash(&tx, 1, &script, SighashType::ALL).unwrap();
        assert_ne!(h0, h1);
    }

    #[test]
    fn test_index_out_of_range() {
        let tx = two_input_transaction();
        let result = compute_sighash(&tx, 2, &[], SighashType::ALL);
        assert!(matches!(result, Err(SignerError::Serialization(_))));
    }

    #[test]
    fn test_sighash_none_drops_outputs_and_sequences() {
        let tx = two_input_transaction();
        let preimage = sighash_preimage(&tx, 0, &[0x51], SighashType::NONE).unwrap();

        let expected_tx = Transaction {
            version: 1,
            inputs: vec![
                TransactionInput {
                    prevout: tx.inputs[0].prevout.clone(),
                    script_sig: vec![0x51],
                    sequence: 0xffffffff,
                },
                TransactionInput {
                    prevout: tx.inputs[1].prevout.clone(),
                    script_sig: vec![],
                    sequence: 0,
                },
            ],
            outputs: vec![],
            lock_time: 0,
        };
        let mut expected = expected_tx.serialize().unwrap();
        expected.extend_from_slice(&[0x02, 0, 0, 0]);
        assert_eq!(preimage, expected);
    }

    #[test]
    fn test_sighash_single_blanks_earlier_outputs() {
        let tx = two_input_transaction();
        let preimage = sighash_preimage(&tx, 1, &[0x51], SighashType::SINGLE).unwrap();

        let blank = TransactionOutput { value: -1, script_pubkey: vec![] };
        let expected_tx = Transaction {
            version: 1,
            inputs: vec![
                TransactionInput {
                    prevout: tx.inputs[0].prevout.clone(),
                    script_sig: vec![],
                    sequence: 0,
                },
                TransactionInput {
                    prevout: tx.inputs[1].prevout.clone(),
                    script_sig: vec![0x51],
                    sequence: 0xffffffff,
                },
            ],
            outputs: vec![blank, tx.outputs[1].clone()],
            lock_time: 0,
        };
        let mut expected = Vec::new();
        write_transaction(&mut expected, &expected_tx).unwrap();
        expected.extend_from_slice(&[0x03, 0, 0, 0]);
        assert_eq!(preimage, expected);
    }

    #[test]
    fn test_sighash_single_without_output() {
        let mut tx = two_input_transaction();
        tx.outputs.truncate(1);
        let hash = compute_sighash(&tx, 1, &[0x51], SighashType::SINGLE).unwrap();
        assert_eq!(hash, SIGHASH_SINGLE_BUG);
    }

    #[test]
    fn test_anyone_can_pay_keeps_only_signed_input() {
        let tx = two_input_transaction();
        let sighash_type = SighashType::ALL.with_anyone_can_pay();
        let preimage = sighash_preimage(&tx, 1, &[0x51], sighash_type).unwrap();

        let expected_tx = Transaction {
            version: 1,
            inputs: vec![TransactionInput {
                prevout: tx.inputs[1].prevout.clone(),
                script_sig: vec![0x51],
                sequence: 0xffffffff,
            }],
            outputs: tx.outputs.clone(),
            lock_time: 0,
        };
        let mut expected = expected_tx.serialize().unwrap();
        expected.extend_from_slice(&[0x81, 0, 0, 0]);
        assert_eq!(preimage, expected);
    }

    #[test]
    fn test_code_separators_removed_from_script_code() {
        let tx = two_input_transaction();
        let with_separator = [0xab, 0x51];
        let h1 = compute_sighash(&tx, 0, &with_separator, SighashType::ALL).unwrap();
        let h2 = compute_sighash(&tx, 0, &[0x51], SighashType::ALL).unwrap();
        assert_eq!(h1, h2);
    }
}
