//! Script chunk parsing and encoding.
//!
//! A script chunk is either an opcode or a data push with its associated bytes.
//! Tapscript has no OP_RETURN data-carrier form, so every byte after an
//! OP_RETURN is decoded as ordinary opcodes.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The data payload, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Return true if this chunk pushes data (including OP_0 and OP_1NEGATE..OP_16).
    pub fn is_push(&self) -> bool {
        self.op <= OP_16 && self.op != OP_RESERVED
    }

    /// Convert this chunk to its ASM string representation.
    ///
    /// Data push chunks are rendered as hex strings; non-push opcodes use
    /// their canonical OP_xxx name.
    pub fn to_asm_string(&self) -> String {
        if self.op > OP_0 && self.op <= OP_PUSHDATA4 {
            if let Some(ref data) = self.data {
                return hex::encode(data);
            }
        }
        opcode_to_string(self.op).to_string()
    }
}

/// Read the chunk starting at `pos` and advance `pos` past it.
///
/// Returns `DataTooSmall` when a push runs past the end of `bytes`.
pub fn read_chunk(bytes: &[u8], pos: &mut usize) -> Result<ScriptChunk, ScriptError> {
    let op = *bytes.get(*pos).ok_or(ScriptError::IndexOutOfRange)?;
    let (header, length) = match op {
        OP_DATA_1..=OP_DATA_75 => (1, op as usize),
        OP_PUSHDATA1 => (2, read_len(bytes, *pos + 1, 1)?),
        OP_PUSHDATA2 => (3, read_len(bytes, *pos + 1, 2)?),
        OP_PUSHDATA4 => (5, read_len(bytes, *pos + 1, 4)?),
        _ => {
            *pos += 1;
            return Ok(ScriptChunk { op, data: None });
        }
    };
    let start = *pos + header;
    let end = start.checked_add(length).ok_or(ScriptError::DataTooBig)?;
    if bytes.len() < end {
        return Err(ScriptError::DataTooSmall);
    }
    *pos = end;
    Ok(ScriptChunk {
        op,
        data: Some(bytes[start..end].to_vec()),
    })
}

fn read_len(bytes: &[u8], at: usize, width: usize) -> Result<usize, ScriptError> {
    let field = bytes.get(at..at + width).ok_or(ScriptError::DataTooSmall)?;
    let mut buf = [0u8; 4];
    buf[..width].copy_from_slice(field);
    Ok(u32::from_le_bytes(buf) as usize)
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// # Arguments
/// * `bytes` - The raw script bytes to decode.
///
/// # Returns
/// A vector of parsed chunks, or a `ScriptError` if a push is truncated.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        chunks.push(read_chunk(bytes, &mut pos)?);
    }
    Ok(chunks)
}

/// Compute the push prefix bytes for a data payload of the given length.
///
/// Chooses the smallest encoding: a direct push up to 75 bytes, then
/// OP_PUSHDATA1, OP_PUSHDATA2 and OP_PUSHDATA4.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= 75 {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

/// Encode multiple data payloads as consecutive pushes.
pub fn encode_push_datas(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let mut result = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let prefix = push_data_prefix(part.len()).map_err(|_| ScriptError::PartTooBig(i))?;
        result.extend_from_slice(&prefix);
        result.extend_from_slice(part);
    }
    Ok(result)
}
