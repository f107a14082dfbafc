//! Interpreter error types.
//!
//! Every [`InterpreterErrorCode`] carries a fixed diagnostic string and a
//! [`Severity`]. The diagnostic is what a node reports when rejecting a
//! spend; the `description` on [`InterpreterError`] holds the detail.

use std::fmt;

/// Whether a failure is an ordinary script failure or a consensus violation
/// that is reported generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Script,
    Consensus,
}

/// Error codes for the script interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpreterErrorCode {
    /// Execution finished with an empty stack or a false top element.
    EvalFalse,
    /// OP_RETURN was executed.
    OpReturn,
    /// Witness stack or combined stacks exceed the element limit.
    StackSize,
    /// A pushed or initial witness element exceeds the size limit.
    PushSize,
    /// Malformed push, OP_VERIF/OP_VERNOTIF, or an opcode with no meaning.
    BadOpcode,
    UnbalancedConditional,
    InvalidStackOperation,
    InvalidAltStackOperation,
    Verify,
    EqualVerify,
    NumEqualVerify,
    /// A non-arithmetic numeric operand is longer than allowed.
    NumberTooBig,
    /// Arithmetic result or operand is outside the 64-bit script number range.
    ArithmeticOverflow,
    DivideByZero,
    /// Introspection index does not name an existing input or output.
    IndexOutOfBounds,
    /// Fixed-width conversion operand has the wrong length.
    InvalidOperandLength,
    /// Transaction context missing or incomplete for the executed opcode.
    InvalidParams,
    MinimalData,
    MinimalIf,
    CleanStack,
    NegativeLockTime,
    UnsatisfiedLockTime,
    DiscourageUpgradableNops,
    DiscourageOpSuccess,
    DiscourageUpgradableTaprootVersion,
    TapscriptCheckMultiSig,
    /// Signature opcodes are evaluated outside this engine.
    UnsupportedOpcode,
}

impl InterpreterErrorCode {
    /// Severity class of this code.
    pub fn severity(self) -> Severity {
        match self {
            InterpreterErrorCode::ArithmeticOverflow | InterpreterErrorCode::IndexOutOfBounds => {
                Severity::Consensus
            }
            _ => Severity::Script,
        }
    }

    /// Fixed diagnostic string reported for this code.
    pub fn message(self) -> &'static str {
        use InterpreterErrorCode::*;
        match self {
            EvalFalse => {
                "Script evaluated without error but finished with a false/empty top stack element"
            }
            OpReturn => "OP_RETURN was encountered",
            StackSize => "Stack size limit exceeded",
            PushSize => "Push value size limit exceeded",
            BadOpcode => "Opcode missing or not understood",
            UnbalancedConditional => "Invalid OP_IF construction",
            InvalidStackOperation => "Operation not valid with the current stack size",
            InvalidAltStackOperation => "Operation not valid with the current altstack size",
            Verify => "Script failed an OP_VERIFY operation",
            EqualVerify => "Script failed an OP_EQUALVERIFY operation",
            NumEqualVerify => "Script failed an OP_NUMEQUALVERIFY operation",
            NumberTooBig => "Script number overflow",
            ArithmeticOverflow => "unknown error",
            DivideByZero => "Arithmetic opcode error",
            IndexOutOfBounds => "Index out of bounds",
            InvalidOperandLength => "Operand has an invalid length",
            InvalidParams => "Transaction context required by this opcode is unavailable",
            MinimalData => "Data push larger than necessary",
            MinimalIf => "OP_IF/NOTIF argument must be minimal in tapscript",
            CleanStack => "Stack size must be exactly one after execution",
            NegativeLockTime => "Negative locktime",
            UnsatisfiedLockTime => "Locktime requirement not satisfied",
            DiscourageUpgradableNops => "NOPx reserved for soft-fork upgrades",
            DiscourageOpSuccess => "OP_SUCCESSx reserved for soft-fork upgrades",
            DiscourageUpgradableTaprootVersion => "Taproot version reserved for soft-fork upgrades",
            TapscriptCheckMultiSig => "OP_CHECKMULTISIG(VERIFY) is not available in tapscript",
            UnsupportedOpcode => "Signature opcodes are not evaluated by this engine",
        }
    }
}

impl fmt::Display for InterpreterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A script interpreter error with an error code and description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {description}")]
pub struct InterpreterError {
    pub code: InterpreterErrorCode,
    pub description: String,
}

impl InterpreterError {
    pub fn new(code: InterpreterErrorCode, description: String) -> Self {
        InterpreterError { code, description }
    }

    /// Shorthand for the severity of this error's code.
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}
