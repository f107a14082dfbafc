//! Script-path witness splitting.
//!
//! A script-path witness is `stack..., script, control block`, optionally
//! followed by an annex (an element starting with `0x50`). The leaf version
//! is the first control block byte with its parity bit cleared. The Merkle
//! commitment is not checked here.

use tap64_script::Script;

use crate::TransactionError;

/// First byte of an annex element.
pub const ANNEX_TAG: u8 = 0x50;
/// Control block size without any Merkle path nodes.
pub const CONTROL_BLOCK_BASE_SIZE: usize = 33;
/// Size of one Merkle path node.
pub const CONTROL_BLOCK_NODE_SIZE: usize = 32;
/// Maximum Merkle path depth.
pub const CONTROL_BLOCK_MAX_NODES: usize = 128;

/// The parts of a script-path spend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPathSpend {
    /// Initial stack, last element on top.
    pub stack: Vec<Vec<u8>>,
    /// The leaf script being executed.
    pub script: Script,
    /// Full control block.
    pub control_block: Vec<u8>,
    /// Annex, including its `0x50` tag byte.
    pub annex: Option<Vec<u8>>,
}

impl ScriptPathSpend {
    /// Split a witness into stack, script, control block and annex.
    ///
    /// # Arguments
    /// * `witness` - The input's witness items, bottom first.
    ///
    /// # Returns
    /// The split spend, or `InvalidWitness` if the witness is a key-path
    /// spend, is empty, or has a malformed control block.
    pub fn from_witness(witness: &[Vec<u8>]) -> Result<Self, TransactionError> {
        let mut items = witness;
        let mut annex = None;
        if let [rest @ .., last] = items {
            if !rest.is_empty() && last.first() == Some(&ANNEX_TAG) {
                annex = Some(last.clone());
                items = rest;
            }
        }

        let [stack @ .., script, control_block] = items else {
            return Err(TransactionError::InvalidWitness(format!(
                "script-path spend needs a script and control block, witness has {} items",
                items.len()
            )));
        };

        let cb_len = control_block.len();
        let nodes = cb_len.saturating_sub(CONTROL_BLOCK_BASE_SIZE) / CONTROL_BLOCK_NODE_SIZE;
        if cb_len < CONTROL_BLOCK_BASE_SIZE
            || (cb_len - CONTROL_BLOCK_BASE_SIZE) % CONTROL_BLOCK_NODE_SIZE != 0
            || nodes > CONTROL_BLOCK_MAX_NODES
        {
            return Err(TransactionError::InvalidWitness(format!(
                "control block of {} bytes is malformed",
                cb_len
            )));
        }

        Ok(ScriptPathSpend {
            stack: stack.to_vec(),
            script: Script::from_bytes(script),
            control_block: control_block.clone(),
            annex,
        })
    }

    /// Leaf version selected by the control block.
    pub fn leaf_version(&self) -> u8 {
        self.control_block[0] & 0xfe
    }

    /// Number of Merkle path nodes in the control block.
    pub fn path_len(&self) -> usize {
        (self.control_block.len() - CONTROL_BLOCK_BASE_SIZE) / CONTROL_BLOCK_NODE_SIZE
    }

    /// Build a witness for a script-path spend.
    ///
    /// # Arguments
    /// * `stack` - Initial stack, last element on top.
    /// * `script` - The leaf script.
    /// * `control_block` - Control block bytes.
    pub fn to_witness(stack: &[Vec<u8>], script: &Script, control_block: &[u8]) -> Vec<Vec<u8>> {
        let mut witness = stack.to_vec();
        witness.push(script.to_bytes().to_vec());
        witness.push(control_block.to_vec());
        witness
    }
}
