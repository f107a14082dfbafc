/// Transaction model and input verification for 64-bit tapscript.
///
/// Provides the Transaction type with inputs, outputs and witnesses, the
/// script-path witness split, and per-input and parallel whole-transaction
/// verification against the tapscript interpreter.

pub mod transaction;
pub mod input;
pub mod output;
pub mod spend;
pub mod validation;

mod error;
pub use error::TransactionError;
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use spend::ScriptPathSpend;
pub use validation::{check_input, verify_all_inputs, verify_input, RejectReason};
