//! Error types for transaction construction and signing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("No spendable funds")]
    NoSpendableFunds,

    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: i64, required: i64 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid nonce: {0}")]
    InvalidNonce(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid UTXO: {0}")]
    InvalidUtxo(String),

    #[error("External collaborator failed: {0}")]
    External(#[from] anyhow::Error),
}

impl From<std::io::Error> for SignerError {
    fn from(err: std::io::Error) -> Self {
        SignerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SignerError>;
