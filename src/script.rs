//! Script construction and parsing for legacy pay-to-pubkey-hash spends

use crate::constants::*;
use crate::error::{Result, SignerError};
use crate::types::ByteString;

/// Append a minimal data push of `data` to `script`
///
/// |data| < 0x4c → <len> data
/// |data| ≤ 0xff → OP_PUSHDATA1 <len:1> data
/// |data| ≤ 0xffff → OP_PUSHDATA2 <len:2 LE> data
/// otherwise → OP_PUSHDATA4 <len:4 LE> data
pub fn push_data(script: &mut ByteString, data: &[u8]) -> Result<()> {
    let len = data.len();
    if len > MAX_SCRIPT_SIZE {
        return Err(SignerError::Serialization(format!(
            "push of {} bytes exceeds script size limit",
            len
        )));
    }

    if len < OP_PUSHDATA1 as usize {
        script.push(len as u8);
    } else if len <= 0xff {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else if len <= 0xffff {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        script.push(OP_PUSHDATA4);
        script.extend_from_slice(&(len as u32).to_le_bytes());
    }
    script.extend_from_slice(data);
    Ok(())
}

/// OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
pub fn p2pkh_script(pubkey_hash: &[u8; 20]) -> ByteString {
    let mut script = Vec::with_capacity(25);
    script.push(OP_DUP);
    script.push(OP_HASH160);
    script.push(20);
    script.extend_from_slice(pubkey_hash);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}

/// OP_HASH160 <20> OP_EQUAL
pub fn p2sh_script(script_hash: &[u8; 20]) -> ByteString {
    let mut script = Vec::with_capacity(23);
    script.push(OP_HASH160);
    script.push(20);
    script.extend_from_slice(script_hash);
    script.push(OP_EQUAL);
    script
}

/// Check the 25-byte P2PKH template
pub fn is_p2pkh(script: &[u8]) -> bool {
    script.len() == 25
        && script[0] == OP_DUP
        && script[1] == OP_HASH160
        && script[2] == 20
        && script[23] == OP_EQUALVERIFY
        && script[24] == OP_CHECKSIG
}

/// Unlocking script: <signature ‖ hashtype> <public key>
pub fn p2pkh_unlocking_script(signature: &[u8], public_key: &[u8]) -> Result<ByteString> {
    let mut script = Vec::with_capacity(signature.len() + public_key.len() + 2);
    push_data(&mut script, signature)?;
    push_data(&mut script, public_key)?;
    Ok(script)
}

/// Offset of the opcode following the one at `i`.
///
/// Returns `Serialization` if a push runs past the end of the script.
pub fn next_op(i: usize, script: &[u8]) -> Result<usize> {
    let truncated = || SignerError::Serialization(format!("truncated push at offset {}", i));
    let opcode = *script.get(i).ok_or_else(truncated)?;

    let (header, len) = match opcode {
        0x01..=0x4b => (1, opcode as usize),
        OP_PUSHDATA1 => {
            let len = *script.get(i + 1).ok_or_else(truncated)?;
            (2, len as usize)
        }
        OP_PUSHDATA2 => {
            let bytes = script.get(i + 1..i + 3).ok_or_else(truncated)?;
            (3, u16::from_le_bytes([bytes[0], bytes[1]]) as usize)
        }
        OP_PUSHDATA4 => {
            let bytes = script.get(i + 1..i + 5).ok_or_else(truncated)?;
            (5, u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
        }
        _ => (1, 0),
    };

    let next = i + header + len;
    if next > script.len() {
        return Err(truncated());
    }
    Ok(next)
}

/// Data pushed by a push-only script, in order
pub fn parse_pushes(script: &[u8]) -> Result<Vec<ByteString>> {
    let mut pushes = Vec::new();
    let mut i = 0;
    while i < script.len() {
        let next = next_op(i, script)?;
        let header = match script[i] {
            OP_0 => 1,
            0x01..=0x4b => 1,
            OP_PUSHDATA1 => 2,
            OP_PUSHDATA2 => 3,
            OP_PUSHDATA4 => 5,
            other => {
                return Err(SignerError::Serialization(format!(
                    "non-push opcode 0x{:02x} at offset {}",
                    other, i
                )))
            }
        };
        pushes.push(script[i + header..next].to_vec());
        i = next;
    }
    Ok(pushes)
}

/// Script code for the legacy sighash: `script` without OP_CODESEPARATOR
pub fn remove_code_separators(script: &[u8]) -> Result<ByteString> {
    let mut out = Vec::with_capacity(script.len());
    let mut i = 0;
    while i < script.len() {
        let next = next_op(i, script)?;
        if script[i] != OP_CODESEPARATOR {
            out.extend_from_slice(&script[i..next]);
        }
        i = next;
    }
    Ok(out)
}
