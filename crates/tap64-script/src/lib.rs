/// Tapscript parsing and execution with 64-bit arithmetic.
///
/// Provides the Script type, opcode definitions, script chunk parsing, and
/// an interpreter for the base tapscript leaf and the 64-bit arithmetic leaf
/// (OP_MUL, OP_DIV, OP_INOUT_AMOUNT, LE64 conversions).

pub mod script;
pub mod opcodes;
pub mod chunk;
pub mod interpreter;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use chunk::ScriptChunk;
