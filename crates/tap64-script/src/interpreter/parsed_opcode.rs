//! Parsed opcode representation and the tapscript pre-execution scan.

use crate::chunk::read_chunk;
use crate::opcodes::*;
use crate::Script;

use super::config::Config;
use super::error::{InterpreterError, InterpreterErrorCode};

/// A parsed opcode with its data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOpcode {
    /// The opcode byte value.
    pub opcode: u8,
    /// The data payload associated with push opcodes (empty for non-push opcodes).
    pub data: Vec<u8>,
}

impl ParsedOpcode {
    /// Return the human-readable name of this opcode.
    pub fn name(&self) -> &'static str {
        opcode_to_string(self.opcode)
    }

    /// Return true if this opcode is evaluated even inside a non-executing branch.
    pub fn is_conditional(&self) -> bool {
        (OP_IF..=OP_ENDIF).contains(&self.opcode)
    }

    /// Return true for OP_0 through OP_PUSHDATA4.
    pub fn is_data_push(&self) -> bool {
        self.opcode <= OP_PUSHDATA4
    }

    /// Check that push uses minimal encoding.
    pub fn enforce_minimum_data_push(&self) -> Result<(), InterpreterError> {
        let data_len = self.data.len();
        let expected = match data_len {
            0 => OP_0,
            1 if (1..=16).contains(&self.data[0]) => OP_1 + self.data[0] - 1,
            1 if self.data[0] == 0x81 => OP_1NEGATE,
            1..=75 => data_len as u8,
            76..=255 => OP_PUSHDATA1,
            256..=65535 => OP_PUSHDATA2,
            _ => return Ok(()),
        };
        if self.opcode != expected {
            return Err(InterpreterError::new(
                InterpreterErrorCode::MinimalData,
                format!(
                    "data push of {} bytes encoded with opcode {} instead of {}",
                    data_len,
                    self.name(),
                    opcode_to_string(expected)
                ),
            ));
        }
        Ok(())
    }
}

/// A parsed script is a sequence of parsed opcodes.
pub type ParsedScript = Vec<ParsedOpcode>;

/// Result of scanning a leaf script before execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptScan {
    /// Every opcode decoded and none is OP_SUCCESSx.
    Parsed(ParsedScript),
    /// An OP_SUCCESSx opcode was reached; the script succeeds unconditionally.
    OpSuccess(u8),
}

/// Decode a leaf script, stopping at the first OP_SUCCESSx.
///
/// A malformed push found before any OP_SUCCESSx is `BadOpcode`; bytes after
/// an OP_SUCCESSx are never examined.
pub fn parse_script(script: &Script, cfg: &Config) -> Result<ScriptScan, InterpreterError> {
    let bytes = script.to_bytes();
    let mut parsed_ops = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let offset = pos;
        if cfg.is_op_success(bytes[pos]) {
            return Ok(ScriptScan::OpSuccess(bytes[pos]));
        }
        let chunk = read_chunk(bytes, &mut pos).map_err(|e| {
            InterpreterError::new(
                InterpreterErrorCode::BadOpcode,
                format!("malformed push at offset {}: {}", offset, e),
            )
        })?;
        parsed_ops.push(ParsedOpcode {
            opcode: chunk.op,
            data: chunk.data.unwrap_or_default(),
        });
    }

    Ok(ScriptScan::Parsed(parsed_ops))
}
