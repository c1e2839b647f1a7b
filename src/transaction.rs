//! Transaction model: construction, structural checks and identifiers

use crate::constants::*;
use crate::error::Result;
use crate::hashes::double_sha256;
use crate::serialization::{serialize_transaction, serialized_size};
use crate::types::*;
use std::collections::HashSet;

impl Transaction {
    /// Empty version-1 transaction with lock time 0
    pub fn new() -> Self {
        Self {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Append an input spending `prevout` with an empty unlocking script
    pub fn add_input(&mut self, prevout: OutPoint) -> &mut Self {
        self.inputs.push(TransactionInput {
            prevout,
            script_sig: Vec::new(),
            sequence: SEQUENCE_FINAL,
        });
        self
    }

    /// Append an output paying `value` to `script_pubkey`
    pub fn add_output(&mut self, value: Integer, script_pubkey: ByteString) -> &mut Self {
        self.outputs.push(TransactionOutput { value, script_pubkey });
        self
    }

    /// Canonical wire bytes
    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize_transaction(self)
    }

    pub fn size(&self) -> usize {
        serialized_size(self)
    }

    pub fn total_output_value(&self) -> Integer {
        self.outputs.iter().map(|o| o.value).sum()
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

/// TxId: 𝒯𝒳 → ℍ
///
/// TxId(tx) = reverse(SHA256d(Serialize(tx))), rendered as hex
pub fn txid(tx: &Transaction) -> Result<String> {
    let mut hash = double_sha256(&serialize_transaction(tx)?);
    hash.reverse();
    Ok(hex::encode(hash))
}

/// CheckTransaction: 𝒯𝒳 → {valid, invalid}
///
/// A transaction tx = (v, ins, outs, lt) is ready for signing if and only if:
/// 1. |ins| > 0 ∧ |outs| > 0
/// 2. ∀o ∈ outs: 0 ≤ o.value ≤ M_max
/// 3. |ins| ≤ M_max_inputs ∧ |outs| ≤ M_max_outputs
/// 4. no outpoint is spent twice
pub fn check_transaction(tx: &Transaction) -> Result<ValidationResult> {
    // 1. Check inputs and outputs are not empty
    if tx.inputs.is_empty() || tx.outputs.is_empty() {
        return Ok(ValidationResult::Invalid("Empty inputs or outputs".to_string()));
    }

    // 2. Check output values are valid
    for (i, output) in tx.outputs.iter().enumerate() {
        if output.value < 0 || output.value > MAX_MONEY {
            return Ok(ValidationResult::Invalid(format!(
                "Invalid output value {} at index {}",
                output.value, i
            )));
        }
    }

    // 3. Check count limits
    if tx.inputs.len() > MAX_INPUTS {
        return Ok(ValidationResult::Invalid(format!(
            "Too many inputs: {}",
            tx.inputs.len()
        )));
    }
    if tx.outputs.len() > MAX_OUTPUTS {
        return Ok(ValidationResult::Invalid(format!(
            "Too many outputs: {}",
            tx.outputs.len()
        )));
    }

    // 4. Check for duplicate prevouts
    let mut seen = HashSet::with_capacity(tx.inputs.len());
    for (i, input) in tx.inputs.iter().enumerate() {
        if !seen.insert(&input.prevout) {
            return Ok(ValidationResult::Invalid(format!(
                "Duplicate prevout {} at input {}",
                input.prevout, i
            )));
        }
    }

    Ok(ValidationResult::Valid)
}
