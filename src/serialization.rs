//! Canonical wire serialization of legacy transactions
//!
//! Serialize(tx) = version:4 ‖ VarInt(|ins|) ‖ ins ‖ VarInt(|outs|) ‖ outs ‖ lock_time:4
//! Serialize(in) = hash:32 ‖ index:4 ‖ VarInt(|script_sig|) ‖ script_sig ‖ sequence:4
//! Serialize(out) = value:8 ‖ VarInt(|script_pubkey|) ‖ script_pubkey
//!
//! All integers little-endian.

use crate::constants::MAX_SCRIPT_SIZE;
use crate::error::{Result, SignerError};
use crate::types::*;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// Number of bytes VarInt(n) occupies
pub fn var_int_size(n: u64) -> usize {
    if n <= 252 {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffffffff {
        5
    } else {
        9
    }
}

pub fn write_var_int<W: Write>(writer: &mut W, n: u64) -> Result<()> {
    if n <= 252 {
        writer.write_u8(n as u8)?;
    } else if n <= 0xffff {
        writer.write_u8(0xfd)?;
        writer.write_u16::<LittleEndian>(n as u16)?;
    } else if n <= 0xffffffff {
        writer.write_u8(0xfe)?;
        writer.write_u32::<LittleEndian>(n as u32)?;
    } else {
        writer.write_u8(0xff)?;
        writer.write_u64::<LittleEndian>(n)?;
    }
    Ok(())
}

pub fn read_var_int<R: Read>(reader: &mut R) -> Result<u64> {
    let n = match reader.read_u8()? {
        0xff => reader.read_u64::<LittleEndian>()?,
        0xfe => reader.read_u32::<LittleEndian>()? as u64,
        0xfd => reader.read_u16::<LittleEndian>()? as u64,
        n => n as u64,
    };
    Ok(n)
}

fn to_u32(value: Natural, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        SignerError::Serialization(format!("{} {} does not fit in 4 bytes", field, value))
    })
}

fn write_script<W: Write>(writer: &mut W, script: &[u8]) -> Result<()> {
    if script.len() > MAX_SCRIPT_SIZE {
        return Err(SignerError::Serialization(format!(
            "script length {} exceeds {}",
            script.len(),
            MAX_SCRIPT_SIZE
        )));
    }
    write_var_int(writer, script.len() as u64)?;
    writer.write_all(script)?;
    Ok(())
}

fn read_script<R: Read>(reader: &mut R) -> Result<ByteString> {
    let len = read_var_int(reader)?;
    if len > MAX_SCRIPT_SIZE as u64 {
        return Err(SignerError::Serialization(format!(
            "script length {} exceeds {}",
            len, MAX_SCRIPT_SIZE
        )));
    }
    let mut script = vec![0u8; len as usize];
    reader.read_exact(&mut script)?;
    Ok(script)
}

pub fn write_outpoint<W: Write>(writer: &mut W, outpoint: &OutPoint) -> Result<()> {
    writer.write_all(&outpoint.hash)?;
    writer.write_u32::<LittleEndian>(to_u32(outpoint.index, "outpoint index")?)?;
    Ok(())
}

pub fn write_input<W: Write>(writer: &mut W, input: &TransactionInput) -> Result<()> {
    write_outpoint(writer, &input.prevout)?;
    write_script(writer, &input.script_sig)?;
    writer.write_u32::<LittleEndian>(to_u32(input.sequence, "sequence")?)?;
    Ok(())
}

pub fn write_output<W: Write>(writer: &mut W, output: &TransactionOutput) -> Result<()> {
    writer.write_i64::<LittleEndian>(output.value)?;
    write_script(writer, &output.script_pubkey)?;
    Ok(())
}

/// Write the canonical form of `tx` without validating output amounts
///
/// The legacy SIGHASH_SINGLE preimage needs blanked outputs with value −1,
/// so amount checks live in `serialize_transaction`.
pub fn write_transaction<W: Write>(writer: &mut W, tx: &Transaction) -> Result<()> {
    writer.write_u32::<LittleEndian>(to_u32(tx.version, "version")?)?;

    write_var_int(writer, tx.inputs.len() as u64)?;
    for input in &tx.inputs {
        write_input(writer, input)?;
    }

    write_var_int(writer, tx.outputs.len() as u64)?;
    for output in &tx.outputs {
        write_output(writer, output)?;
    }

    writer.write_u32::<LittleEndian>(to_u32(tx.lock_time, "lock_time")?)?;
    Ok(())
}

/// Serialize: 𝒯𝒳 → 𝔹*
pub fn serialize_transaction(tx: &Transaction) -> Result<Vec<u8>> {
    for (i, output) in tx.outputs.iter().enumerate() {
        if output.value < 0 {
            return Err(SignerError::Serialization(format!(
                "negative value {} at output {}",
                output.value, i
            )));
        }
    }

    let mut buf = Vec::with_capacity(serialized_size(tx));
    write_transaction(&mut buf, tx)?;
    Ok(buf)
}

/// Exact length of the serialized transaction
pub fn serialized_size(tx: &Transaction) -> usize {
    let inputs: usize = tx
        .inputs
        .iter()
        .map(|i| 32 + 4 + var_int_size(i.script_sig.len() as u64) + i.script_sig.len() + 4)
        .sum();
    let outputs: usize = tx
        .outputs
        .iter()
        .map(|o| 8 + var_int_size(o.script_pubkey.len() as u64) + o.script_pubkey.len())
        .sum();

    4 + var_int_size(tx.inputs.len() as u64)
        + inputs
        + var_int_size(tx.outputs.len() as u64)
        + outputs
        + 4
}

/// Deserialize: 𝔹* → 𝒯𝒳
///
/// Rejects truncated input and trailing bytes.
pub fn deserialize_transaction(bytes: &[u8]) -> Result<Transaction> {
    let mut reader = Cursor::new(bytes);

    let version = reader.read_u32::<LittleEndian>()? as Natural;

    let input_count = read_var_int(&mut reader)?;
    // Each input is at least 41 bytes; bound the allocation by what remains
    if input_count > (bytes.len() as u64) / 41 {
        return Err(SignerError::Serialization(format!(
            "input count {} exceeds buffer",
            input_count
        )));
    }
    let mut inputs = Vec::with_capacity(input_count as usize);
    for _ in 0..input_count {
        let mut hash = [0u8; 32];
        reader.read_exact(&mut hash)?;
        let index = reader.read_u32::<LittleEndian>()? as Natural;
        let script_sig = read_script(&mut reader)?;
        let sequence = reader.read_u32::<LittleEndian>()? as Natural;
        inputs.push(TransactionInput {
            prevout: OutPoint { hash, index },
            script_sig,
            sequence,
        });
    }

    let output_count = read_var_int(&mut reader)?;
    if output_count > (bytes.len() as u64) / 9 {
        return Err(SignerError::Serialization(format!(
            "output count {} exceeds buffer",
            output_count
        )));
    }
    let mut outputs = Vec::with_capacity(output_count as usize);
    for _ in 0..output_count {
        let value = reader.read_i64::<LittleEndian>()?;
        let script_pubkey = read_script(&mut reader)?;
        outputs.push(TransactionOutput { value, script_pubkey });
    }

    let lock_time = reader.read_u32::<LittleEndian>()? as Natural;

    if reader.position() as usize != bytes.len() {
        return Err(SignerError::Serialization(format!(
            "{} trailing bytes",
            bytes.len() - reader.position() as usize
        )));
    }

    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}
