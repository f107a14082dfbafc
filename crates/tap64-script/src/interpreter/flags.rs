//! Script verification flags (bitmask).

use std::ops::{BitOr, BitOrAssign};

/// Script verification flags controlling policy-level interpreter behavior.
///
/// Consensus tapscript rules (MINIMALIF, cleanstack, OP_SUCCESS) are always
/// applied; these flags only add checks or enable the locktime opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);
    pub const VERIFY_MINIMAL_DATA: ScriptFlags = ScriptFlags(1 << 0);
    pub const DISCOURAGE_UPGRADABLE_NOPS: ScriptFlags = ScriptFlags(1 << 1);
    pub const VERIFY_CHECKLOCKTIMEVERIFY: ScriptFlags = ScriptFlags(1 << 2);
    pub const VERIFY_CHECKSEQUENCEVERIFY: ScriptFlags = ScriptFlags(1 << 3);
    pub const DISCOURAGE_OP_SUCCESS: ScriptFlags = ScriptFlags(1 << 4);
    pub const DISCOURAGE_UPGRADABLE_TAPROOT_VERSION: ScriptFlags = ScriptFlags(1 << 5);

    /// Flags every block validator applies.
    pub const MANDATORY: ScriptFlags = ScriptFlags(
        Self::VERIFY_CHECKLOCKTIMEVERIFY.0 | Self::VERIFY_CHECKSEQUENCEVERIFY.0,
    );

    /// Mandatory flags plus mempool policy.
    pub const STANDARD: ScriptFlags = ScriptFlags(
        Self::MANDATORY.0
            | Self::VERIFY_MINIMAL_DATA.0
            | Self::DISCOURAGE_UPGRADABLE_NOPS.0
            | Self::DISCOURAGE_OP_SUCCESS.0
            | Self::DISCOURAGE_UPGRADABLE_TAPROOT_VERSION.0,
    );

    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn add_flag(&mut self, flag: ScriptFlags) {
        self.0 |= flag.0;
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScriptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
