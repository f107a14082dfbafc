/// Error types for script construction and parsing.
///
/// Interpreter failures have their own type,
/// [`crate::interpreter::InterpreterError`].
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Invalid opcode data encountered during ASM parsing.
    #[error("invalid opcode data")]
    InvalidOpcodeData,

    /// Attempted to use append_opcodes for a push data opcode.
    #[error("use append_push_data for push data funcs: {0}")]
    InvalidOpcodeType(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Not enough data in script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds maximum allowed size.
    #[error("data too big")]
    DataTooBig,

    /// A push data part exceeds protocol limits.
    #[error("part too big '{0}'")]
    PartTooBig(usize),

    /// Number cannot be represented as a 64-bit script number.
    #[error("number {0} is outside the script number range")]
    NumberOutOfRange(i64),

    /// Script index is out of range.
    #[error("script index out of range")]
    IndexOutOfRange,
}
