//! Signer configuration

use crate::constants::{DEFAULT_FEE_RATE, DEFAULT_INPUT_SIZE_BYTES};
use crate::error::{Result, SignerError};
use crate::sighash::SighashType;
use crate::types::{Integer, Network};
use serde::{Deserialize, Serialize};

/// Settings passed to `TransactionSigner`; missing fields take defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    pub network: Network,
    /// Satoshis per estimated byte
    pub fee_rate_per_byte: Integer,
    /// Estimated bytes contributed by each spent input
    pub input_size_bytes: Integer,
    pub sighash_type: SighashType,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            fee_rate_per_byte: DEFAULT_FEE_RATE,
            input_size_bytes: DEFAULT_INPUT_SIZE_BYTES,
            sighash_type: SighashType::ALL,
        }
    }
}

impl SignerConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| SignerError::Serialization(format!("config: {}", e)))
    }
}
