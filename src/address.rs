//! Base58Check addresses and their locking scripts
//!
//! Address(P) = Base58(version ‖ HASH160(P) ‖ SHA256d(version ‖ HASH160(P))[0..4])

use crate::constants::*;
use crate::error::{Result, SignerError};
use crate::hashes::{double_sha256, hash160};
use crate::keys::PublicKey;
use crate::script;
use crate::types::{ByteString, Network};
use std::fmt;
use std::str::FromStr;

/// Kind of output an address pays to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    PubkeyHash,
    ScriptHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    pub network: Network,
    pub kind: AddressKind,
    pub hash: [u8; 20],
}

impl Address {
    pub fn from_public_key(public_key: &PublicKey, network: Network) -> Self {
        Self {
            network,
            kind: AddressKind::PubkeyHash,
            hash: hash160(&public_key.serialize_uncompressed()),
        }
    }

    pub fn version_byte(&self) -> u8 {
        match (self.network, self.kind) {
            (Network::Mainnet, AddressKind::PubkeyHash) => MAINNET_P2PKH_VERSION,
            (Network::Mainnet, AddressKind::ScriptHash) => MAINNET_P2SH_VERSION,
            (Network::Testnet, AddressKind::PubkeyHash) => TESTNET_P2PKH_VERSION,
            (Network::Testnet, AddressKind::ScriptHash) => TESTNET_P2SH_VERSION,
        }
    }

    /// Base58Check text form
    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(ADDRESS_PAYLOAD_SIZE);
        payload.push(self.version_byte());
        payload.extend_from_slice(&self.hash);
        let checksum = double_sha256(&payload);
        payload.extend_from_slice(&checksum[..CHECKSUM_SIZE]);
        bs58::encode(payload).into_string()
    }

    /// Decode a Base58Check address.
    ///
    /// Fails with `InvalidAddress` on bad characters, a payload that is not
    /// 25 bytes, a checksum mismatch or an unknown version byte.
    pub fn decode(s: &str) -> Result<Self> {
        let payload = bs58::decode(s)
            .into_vec()
            .map_err(|e| SignerError::InvalidAddress(format!("{}: {}", s, e)))?;

        if payload.len() != ADDRESS_PAYLOAD_SIZE {
            return Err(SignerError::InvalidAddress(format!(
                "{}: payload is {} bytes",
                s,
                payload.len()
            )));
        }

        let (body, checksum) = payload.split_at(ADDRESS_PAYLOAD_SIZE - CHECKSUM_SIZE);
        if double_sha256(body)[..CHECKSUM_SIZE] != *checksum {
            return Err(SignerError::InvalidAddress(format!("{}: checksum mismatch", s)));
        }

        let (network, kind) = match body[0] {
            MAINNET_P2PKH_VERSION => (Network::Mainnet, AddressKind::PubkeyHash),
            MAINNET_P2SH_VERSION => (Network::Mainnet, AddressKind::ScriptHash),
            TESTNET_P2PKH_VERSION => (Network::Testnet, AddressKind::PubkeyHash),
            TESTNET_P2SH_VERSION => (Network::Testnet, AddressKind::ScriptHash),
            other => {
                return Err(SignerError::InvalidAddress(format!(
                    "{}: unknown version byte 0x{:02x}",
                    s, other
                )))
            }
        };

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&body[1..]);
        Ok(Self { network, kind, hash })
    }

    /// Decode and require the address to belong to `network`
    pub fn decode_for(s: &str, network: Network) -> Result<Self> {
        let address = Self::decode(s)?;
        if address.network != network {
            return Err(SignerError::InvalidAddress(format!(
                "{}: address is for {:?}, expected {:?}",
                s, address.network, network
            )));
        }
        Ok(address)
    }

    /// Locking script paying to this address
    pub fn script_pubkey(&self) -> ByteString {
        match self.kind {
            AddressKind::PubkeyHash => script::p2pkh_script(&self.hash),
            AddressKind::ScriptHash => script::p2sh_script(&self.hash),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Address {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mainnet_p2pkh() {
        let address = Address::decode("1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm").unwrap();
        assert_eq!(address.network, Network::Mainnet);
        assert_eq!(address.kind, AddressKind::PubkeyHash);
        assert_eq!(hex::encode(address.hash), "91b24bf9f5288532960ac687abb035127b1d28a5");
    }

    #[test]
    fn test_encode_decode_testnet() {
        let address = Address::decode("mtoKs9V381UAhUia3d7Vb9GNak8Qvmcsme").unwrap();
        assert_eq!(address.network, Network::Testnet);
        assert_eq!(address.encode(), "mtoKs9V381UAhUia3d7Vb9GNak8Qvmcsme");
    }

    #[test]
    fn test_p2pkh_script_pubkey() {
        let address = Address::decode("1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm").unwrap();
        assert_eq!(
            hex::encode(address.script_pubkey()),
            "76a91491b24bf9f5288532960ac687abb035127b1d28a588ac"
        );
    }

    #[test]
    fn test_p2sh_script_pubkey() {
        let address = Address {
            network: Network::Mainnet,
            kind: AddressKind::ScriptHash,
            hash: [0x11; 20],
        };
        let decoded = Address::decode(&address.encode()).unwrap();
        assert_eq!(decoded, address);
        assert!(address.encode().starts_with('3'));

        let script = decoded.script_pubkey();
        assert_eq!(script.len(), 23);
        assert_eq!(script[0], OP_HASH160);
        assert_eq!(script[22], OP_EQUAL);
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        let mut payload = bs58::decode("1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm").into_vec().unwrap();
        payload[24] ^= 0x01;
        let corrupted = bs58::encode(payload).into_string();
        assert!(matches!(Address::decode(&corrupted), Err(SignerError::InvalidAddress(_))));
    }

    #[test]
    fn test_bad_characters_rejected() {
        assert!(matches!(Address::decode("0OIl"), Err(SignerError::InvalidAddress(_))));
    }

    #[test]
    fn test_bech32_rejected() {
        let result = Address::decode("tb1qv0jerhgyxpa7n48qghsuufwrmxh5xt969m9475");
        assert!(matches!(result, Err(SignerError::InvalidAddress(_))));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = bs58::encode([0u8; 10]).into_string();
        assert!(matches!(Address::decode(&short), Err(SignerError::InvalidAddress(_))));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut payload = vec![0x30];
        payload.extend_from_slice(&[0u8; 20]);
        let checksum = double_sha256(&payload);
        payload.extend_from_slice(&checksum[..4]);
        let encoded = bs58::encode(payload).into_string();
        assert!(matches!(Address::decode(&encoded), Err(SignerError::InvalidAddress(_))));
    }

    #[test]
    fn test_decode_for_network_mismatch() {
        let result = Address::decode_for("1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm", Network::Testnet);
        assert!(matches!(result, Err(SignerError::InvalidAddress(_))));
        let mainnet = "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm";
        assert!(Address::decode_for(mainnet, Network::Mainnet).is_ok());
    }
}
