//! # Legacy-Signer
//!
//! Manual construction and signing of legacy (pre-segwit) Bitcoin transactions.
//!
//! Every step of the signing path is computed explicitly rather than delegated
//! to a library signing routine: the legacy signature hash, a deterministic
//! Keccak-keyed nonce, scalar ECDSA with low-s normalization, DER encoding and
//! the final P2PKH unlocking scripts. libsecp256k1 is only used for point
//! multiplication and to cross-verify each produced signature.
//!
//! ## Pipeline
//!
//! - Key material (d, d·G, Base58Check address)
//! - Fee plan over the spend set
//! - Unsigned transaction (destination output, then change)
//! - Per input: sighash, nonce, (r, s), DER ‖ hashtype
//! - Assembled transaction, serialized to lowercase hex
//!
//! UTXO retrieval and broadcast are left to the caller through the
//! [`UtxoSource`](utxo::UtxoSource) and [`Broadcaster`](broadcast::Broadcaster)
//! traits.
//!
//! ## Usage
//!
//! ```rust
//! use legacy_signer::{SignerConfig, TransactionSigner};
//! use legacy_signer::keys::PrivateKey;
//! use legacy_signer::utxo::UtxoRecord;
//!
//! let signer = TransactionSigner::new(SignerConfig::default());
//! let key = PrivateKey::from_hex(
//!     "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d",
//! ).unwrap();
//! let utxos = vec![UtxoRecord {
//!     transaction_id: "8ab9c4f5e3b0f7d1d4b4c2a6e1b0a1c7f2e6d5c4b3a29180706f5e4d3c2b1a09".into(),
//!     output_index: 1,
//!     amount_satoshis: 60000,
//! }];
//! let signed = signer
//!     .build_signed_transaction(&key, &utxos, "mtoKs9V381UAhUia3d7Vb9GNak8Qvmcsme", 4000)
//!     .unwrap();
//! assert_eq!(signed.plan.fee, 255);
//! assert!(signed.hex.starts_with("01000000"));
//! ```

pub mod types;
pub mod constants;
pub mod hashes;
pub mod keys;
pub mod address;
pub mod economic;
pub mod transaction;
pub mod serialization;
pub mod script;
pub mod sighash;
pub mod nonce;
pub mod ecdsa;
pub mod assembler;
pub mod utxo;
pub mod broadcast;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use config::SignerConfig;
pub use error::{Result, SignerError};

use address::Address;
use broadcast::{BroadcastRequest, BroadcastResponse, Broadcaster};
use economic::FeePlan;
use keys::{PrivateKey, PublicKey};
use sighash::SighashType;
use utxo::{UtxoRecord, UtxoSource};

/// Output of the signing pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Broadcastable lowercase hex
    pub hex: String,
    /// Display-order transaction id
    pub txid: String,
    pub plan: FeePlan,
    pub transaction: Transaction,
}

/// Main signer facade
///
/// Holds the configuration and exposes the pipeline stages as methods.
///
/// # Examples
///
/// ```
/// use legacy_signer::{Network, SignerConfig, TransactionSigner};
/// use legacy_signer::keys::PrivateKey;
///
/// let signer = TransactionSigner::new(SignerConfig {
///     network: Network::Mainnet,
///     ..SignerConfig::default()
/// });
/// let key = PrivateKey::from_hex(
///     "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d",
/// ).unwrap();
/// let (_, address) = signer.derive(&key);
/// assert_eq!(address.to_string(), "1GAehh7TsJAHuUAeKZcXf5CnwuGuGgyX2S");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionSigner {
    config: SignerConfig,
}

impl TransactionSigner {
    pub fn new(config: SignerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Public key and address of `private_key` on the configured network
    pub fn derive(&self, private_key: &PrivateKey) -> (PublicKey, Address) {
        keys::derive(private_key, self.config.network)
    }

    /// Fee plan for spending `utxos`
    ///
    /// fee = rate × (#utxos × input_size_bytes)
    pub fn plan_fees(&self, utxos: &[UtxoRecord], amount: Integer) -> Result<FeePlan> {
        let total = utxo::validate_spend_set(utxos)?;
        let estimated = economic::estimate_size(utxos.len(), self.config.input_size_bytes);
        economic::plan(total, amount, self.config.fee_rate_per_byte, estimated)
    }

    /// Sighash of one input under the configured hash type
    pub fn compute_sighash(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &[u8],
    ) -> Result<Hash> {
        sighash::compute_sighash(tx, input_index, script_code, self.config.sighash_type)
    }

    /// Sign every input of `tx` against the same P2PKH script code
    ///
    /// All inputs are signed before any unlocking script is attached, so every
    /// sighash is taken over the unsigned transaction.
    pub fn sign_transaction(
        &self,
        tx: Transaction,
        private_key: &PrivateKey,
        script_code: &[u8],
    ) -> Result<Transaction> {
        if !script::is_p2pkh(script_code) {
            return Err(SignerError::Serialization(
                "script code is not a P2PKH template".to_string(),
            ));
        }
        let sighash_type: SighashType = self.config.sighash_type;
        let signatures = (0..tx.inputs.len())
            .map(|i| assembler::sign_input(&tx, i, private_key, script_code, sighash_type))
            .collect::<Result<Vec<_>>>()?;
        assembler::attach_signatures(tx, &signatures)
    }

    /// Build, sign and serialize a payment of `amount` to `destination`,
    /// returning change to the key's own address.
    pub fn build_signed_transaction(
        &self,
        private_key: &PrivateKey,
        utxos: &[UtxoRecord],
        destination: &str,
        amount: Integer,
    ) -> Result<SignedTransaction> {
        let recipient = Address::decode_for(destination, self.config.network)?;
        let (_, own_address) = self.derive(private_key);
        let total_input = utxo::validate_spend_set(utxos)?;
        let fee_plan = self.plan_fees(utxos, amount)?;
        tracing::debug!(
            "Planned spend of {} inputs: send {} change {} fee {}",
            utxos.len(),
            fee_plan.send_amount,
            fee_plan.change_amount,
            fee_plan.fee
        );

        let own_script = own_address.script_pubkey();
        let mut tx = Transaction::new();
        for utxo in utxos {
            tx.add_input(utxo.outpoint()?);
        }
        tx.add_output(fee_plan.send_amount, recipient.script_pubkey());
        if fee_plan.change_amount > 0 {
            tx.add_output(fee_plan.change_amount, own_script.clone());
        }

        let signed = self.sign_transaction(tx, private_key, &own_script)?;
        if let ValidationResult::Invalid(reason) = transaction::check_transaction(&signed)? {
            return Err(SignerError::Serialization(reason));
        }
        let paid = economic::calculate_fee(&signed, total_input)?;
        if paid != fee_plan.fee {
            return Err(SignerError::Serialization(format!(
                "transaction pays fee {}, planned {}",
                paid, fee_plan.fee
            )));
        }

        let hex = hex::encode(serialization::serialize_transaction(&signed)?);
        let txid = transaction::txid(&signed)?;
        tracing::debug!("Signed transaction {} ({} bytes)", txid, hex.len() / 2);

        Ok(SignedTransaction {
            hex,
            txid,
            plan: fee_plan,
            transaction: signed,
        })
    }

    /// Fetch UTXOs for the key's address, sign, and hand the result to
    /// `broadcaster`. The node's reply is returned unmodified.
    pub fn spend<S: UtxoSource, B: Broadcaster>(
        &self,
        private_key: &PrivateKey,
        source: &S,
        broadcaster: &B,
        destination: &str,
        amount: Integer,
    ) -> Result<BroadcastResponse> {
        let (_, own_address) = self.derive(private_key);
        let utxos = source.fetch_utxos(&own_address)?;
        tracing::debug!("Fetched {} UTXOs for {}", utxos.len(), own_address);

        let signed = self.build_signed_transaction(private_key, &utxos, destination, amount)?;
        let request = BroadcastRequest::send_raw_transaction(signed.hex);
        let response = broadcaster.broadcast(&request)?;
        Ok(BroadcastResponse(response))
    }
}
