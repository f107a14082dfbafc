//! Interpreter configuration per tapscript leaf version.

use crate::opcodes::*;

/// Leaf version byte of base tapscript.
pub const LEAF_VERSION_TAPSCRIPT: u8 = 0xc0;
/// Leaf version byte of tapscript with 64-bit arithmetic.
pub const LEAF_VERSION_TAPSCRIPT_64BIT: u8 = 0xc2;

/// Combined stack + altstack element limit.
pub const MAX_STACK_SIZE: usize = 1000;
/// Largest element that may be pushed or supplied in the witness.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Numeric operand length in base tapscript.
pub const MAX_SCRIPT_NUMBER_LENGTH: usize = 4;
/// Numeric operand length in the 64-bit leaf.
pub const MAX_SCRIPT_NUMBER_LENGTH_64BIT: usize = 8;
/// Operand length accepted by CHECKLOCKTIMEVERIFY and CHECKSEQUENCEVERIFY.
pub const LOCKTIME_NUMBER_LENGTH: usize = 5;

/// The rule set selected by a leaf version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafVersion {
    Tapscript,
    Tapscript64,
}

impl LeafVersion {
    /// Map a leaf version byte (already masked with 0xfe) to a known rule set.
    pub fn from_byte(version: u8) -> Option<Self> {
        match version {
            LEAF_VERSION_TAPSCRIPT => Some(LeafVersion::Tapscript),
            LEAF_VERSION_TAPSCRIPT_64BIT => Some(LeafVersion::Tapscript64),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            LeafVersion::Tapscript => LEAF_VERSION_TAPSCRIPT,
            LeafVersion::Tapscript64 => LEAF_VERSION_TAPSCRIPT_64BIT,
        }
    }
}

/// Script configuration limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub leaf_version: LeafVersion,
}

impl Config {
    pub fn tapscript() -> Self {
        Config { leaf_version: LeafVersion::Tapscript }
    }

    pub fn tapscript_64bit() -> Self {
        Config { leaf_version: LeafVersion::Tapscript64 }
    }

    /// Configuration for a leaf version byte, or `None` if the version is unknown.
    pub fn for_leaf_version(version: u8) -> Option<Self> {
        LeafVersion::from_byte(version).map(|leaf_version| Config { leaf_version })
    }

    /// True when OP_MUL, OP_DIV, OP_INOUT_AMOUNT and the LE64 opcodes are enabled.
    pub fn wide_arithmetic(&self) -> bool {
        self.leaf_version == LeafVersion::Tapscript64
    }

    pub fn max_stack_size(&self) -> usize {
        MAX_STACK_SIZE
    }

    pub fn max_script_element_size(&self) -> usize {
        MAX_SCRIPT_ELEMENT_SIZE
    }

    pub fn max_script_number_length(&self) -> usize {
        if self.wide_arithmetic() {
            MAX_SCRIPT_NUMBER_LENGTH_64BIT
        } else {
            MAX_SCRIPT_NUMBER_LENGTH
        }
    }

    /// Whether `op` acts as OP_SUCCESSx under this leaf version.
    pub fn is_op_success(&self, op: u8) -> bool {
        if self.wide_arithmetic()
            && matches!(
                op,
                OP_MUL | OP_DIV | OP_INOUT_AMOUNT | OP_SCRIPTNUMTOLE64 | OP_LE64TOSCRIPTNUM | OP_LE32TOLE64
            )
        {
            return false;
        }
        matches!(
            op,
            80 | 98 | 126..=129 | 131..=134 | 137..=138 | 141..=142 | 149..=153 | 187..=254
        )
    }
}
