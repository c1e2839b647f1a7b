//! Curve, script and serialization constants

/// secp256k1 group order n
pub const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b,
    0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// ⌊n/2⌋, the largest canonical (low-s) signature component
pub const HALF_CURVE_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d,
    0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Uncompressed public key: 0x04 ‖ X ‖ Y
pub const UNCOMPRESSED_PUBKEY_SIZE: usize = 65;

/// Prefix byte of an uncompressed public key
pub const UNCOMPRESSED_PUBKEY_PREFIX: u8 = 0x04;

/// Address payload: version ‖ hash160 ‖ checksum
pub const ADDRESS_PAYLOAD_SIZE: usize = 25;

/// Base58Check checksum length
pub const CHECKSUM_SIZE: usize = 4;

/// Mainnet pay-to-pubkey-hash version byte
pub const MAINNET_P2PKH_VERSION: u8 = 0x00;

/// Mainnet pay-to-script-hash version byte
pub const MAINNET_P2SH_VERSION: u8 = 0x05;

/// Testnet pay-to-pubkey-hash version byte
pub const TESTNET_P2PKH_VERSION: u8 = 0x6f;

/// Testnet pay-to-script-hash version byte
pub const TESTNET_P2SH_VERSION: u8 = 0xc4;

/// Default transaction version
pub const TX_VERSION: u64 = 1;

/// Sequence number for final transaction
pub const SEQUENCE_FINAL: u64 = 0xffffffff;

/// Maximum money supply: 21,000,000 BTC in satoshis
pub const MAX_MONEY: i64 = 21_000_000 * 100_000_000;

/// Maximum number of inputs per transaction
pub const MAX_INPUTS: usize = 1000;

/// Maximum number of outputs per transaction
pub const MAX_OUTPUTS: usize = 1000;

/// Maximum script length
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Fee rate used when none is configured (sat/byte)
pub const DEFAULT_FEE_RATE: i64 = 1;

/// Per-input size estimate used when none is configured
pub const DEFAULT_INPUT_SIZE_BYTES: i64 = 255;

// Opcodes
pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
