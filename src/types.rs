//! Transaction data model shared by every signing stage

use serde::{Deserialize, Serialize};
use std::fmt;

/// 256-bit digest (sighash, txid in wire order)
pub type Hash = [u8; 32];

/// Raw script or payload bytes
pub type ByteString = Vec<u8>;

/// Indices, sequences, version and locktime; must fit u32 on the wire
pub type Natural = u64;

/// Satoshi amounts
pub type Integer = i64;

/// OutPoint: 𝒪 = ℍ × ℕ
///
/// `hash` is kept in wire (internal) byte order, i.e. reversed relative to
/// the hex transaction id shown by explorers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: Natural,
}

/// `txid:vout` with the txid in display order
impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut display = self.hash;
        display.reverse();
        write!(f, "{}:{}", hex::encode(display), self.index)
    }
}

/// Transaction Input: ℐ = 𝒪 × 𝕊 × ℕ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    /// Empty until the assembler attaches `<sig> <pubkey>`
    pub script_sig: ByteString,
    pub sequence: Natural,
}

/// Transaction Output: 𝒯 = ℤ × 𝕊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: Integer,
    pub script_pubkey: ByteString,
}

/// Transaction: 𝒯𝒳 = ℕ × ℐ* × 𝒯* × ℕ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: Natural,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: Natural,
}

/// Chain selection for address version bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Default for Network {
    fn default() -> Self {
        Network::Testnet
    }
}

/// Outcome of the pre-serialization sanity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}
