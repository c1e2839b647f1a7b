//! Unspent outputs supplied by an external source

use crate::address::Address;
use crate::error::{Result, SignerError};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One spendable output as reported by a UTXO source.
///
/// Accepts both `{transactionId, outputIndex, amountSatoshis}` and the
/// block-explorer shape `{txid, vout, value}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoRecord {
    /// Display-order (reversed) transaction id, hex
    #[serde(alias = "txid")]
    pub transaction_id: String,
    #[serde(alias = "vout")]
    pub output_index: Natural,
    #[serde(alias = "value")]
    pub amount_satoshis: Integer,
}

impl UtxoRecord {
    /// Outpoint in wire byte order
    pub fn outpoint(&self) -> Result<OutPoint> {
        let bytes = hex::decode(&self.transaction_id).map_err(|e| {
            SignerError::InvalidUtxo(format!("bad txid {}: {}", self.transaction_id, e))
        })?;
        if bytes.len() != 32 {
            return Err(SignerError::InvalidUtxo(format!(
                "txid must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        if self.output_index > u32::MAX as Natural {
            return Err(SignerError::InvalidUtxo(format!(
                "output index {} does not fit u32",
                self.output_index
            )));
        }

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        hash.reverse();
        Ok(OutPoint {
            hash,
            index: self.output_index,
        })
    }
}

/// Check a spend set and return Σ amounts.
///
/// Empty → `NoSpendableFunds`. Non-positive amounts, malformed ids and
/// repeated outpoints → `InvalidUtxo`.
pub fn validate_spend_set(utxos: &[UtxoRecord]) -> Result<Integer> {
    if utxos.is_empty() {
        return Err(SignerError::NoSpendableFunds);
    }

    let mut seen = HashSet::new();
    let mut total: Integer = 0;
    for utxo in utxos {
        if utxo.amount_satoshis <= 0 {
            return Err(SignerError::InvalidUtxo(format!(
                "{}:{} has non-positive amount {}",
                utxo.transaction_id, utxo.output_index, utxo.amount_satoshis
            )));
        }
        let outpoint = utxo.outpoint()?;
        if !seen.insert(outpoint) {
            return Err(SignerError::InvalidUtxo(format!(
                "duplicate outpoint {}:{}",
                utxo.transaction_id, utxo.output_index
            )));
        }
        total = total.checked_add(utxo.amount_satoshis).ok_or_else(|| {
            SignerError::InvalidUtxo("total amount overflows".to_string())
        })?;
    }
    Ok(total)
}

/// Where unspent outputs for an address come from (HTTP API, node, fixture)
pub trait UtxoSource {
    fn fetch_utxos(&self, address: &Address) -> anyhow::Result<Vec<UtxoRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "8ab9c4f5e3b0f7d1d4b4c2a6e1b0a1c7f2e6d5c4b3a29180706f5e4d3c2b1a09";

    fn record(txid: &str, index: Natural, amount: Integer) -> UtxoRecord {
        UtxoRecord {
            transaction_id: txid.to_string(),
            output_index: index,
            amount_satoshis: amount,
        }
    }

    #[test]
    fn test_outpoint_reverses_txid() {
        let outpoint = record(TXID, 1, 60000).outpoint().unwrap();
        assert_eq!(outpoint.hash[0], 0x09);
        assert_eq!(outpoint.hash[31], 0x8a);
        assert_eq!(outpoint.index, 1);
        assert_eq!(outpoint.to_string(), format!("{}:1", TXID));
    }

    #[test]
    fn test_outpoint_rejects_bad_txid() {
        assert!(matches!(record("zz", 0, 1).outpoint(), Err(SignerError::InvalidUtxo(_))));
        assert!(matches!(record("abcd", 0, 1).outpoint(), Err(SignerError::InvalidUtxo(_))));
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let camel: UtxoRecord = serde_json::from_str(&format!(
            r#"{{"transactionId":"{}","outputIndex":1,"amountSatoshis":60000}}"#,
            TXID
        ))
        .unwrap();
        let explorer: UtxoRecord =
            serde_json::from_str(&format!(r#"{{"txid":"{}","vout":1,"value":60000}}"#, TXID))
                .unwrap();
        assert_eq!(camel, explorer);
        assert_eq!(camel, record(TXID, 1, 60000));
    }

    #[test]
    fn test_validate_spend_set_total() {
        let other = "1f2e3d4c5b6a79881726354453627180f9e8d7c6b5a4938271605f4e3d2c1b0a";
        let total = validate_spend_set(&[record(TXID, 1, 60000), record(other, 0, 40000)]).unwrap();
        assert_eq!(total, 100000);
    }

    #[test]
    fn test_validate_spend_set_empty() {
        assert!(matches!(validate_spend_set(&[]), Err(SignerError::NoSpendableFunds)));
    }

    #[test]
    fn test_validate_spend_set_zero_amount() {
        let result = validate_spend_set(&[record(TXID, 0, 0)]);
        assert!(matches!(result, Err(SignerError::InvalidUtxo(_))));
    }

    #[test]
    fn test_validate_spend_set_duplicate() {
        let result = validate_spend_set(&[record(TXID, 0, 10), record(TXID, 0, 20)]);
        assert!(matches!(result, Err(SignerError::InvalidUtxo(_))));
        assert!(validate_spend_set(&[record(TXID, 0, 10), record(TXID, 1, 20)]).is_ok());
    }
}
