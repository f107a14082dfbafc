//! Input verification and reject-reason rendering.
//!
//! Each input is a script-path spend evaluated against the transaction as
//! its [`TxContext`]. The transaction is read-only during verification, so
//! inputs are checked in parallel.

use log::debug;
use rayon::prelude::*;
use tap64_script::interpreter::{Engine, ExecutionOutcome, ScriptFlags};

use crate::spend::ScriptPathSpend;
use crate::{Transaction, TransactionError};

/// Reject code for a script verification failure.
pub const REJECT_INVALID: u8 = 0x10;

/// Why an input was rejected, in the form reported to peers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("input {input_idx}: {reason} (code {code})")]
pub struct RejectReason {
    /// Index of the rejected input.
    pub input_idx: usize,
    /// Reject code sent with the rejection.
    pub code: u8,
    /// Human-readable reason, e.g.
    /// `mandatory-script-verify-flag-failed (Index out of bounds)`.
    pub reason: String,
}

impl RejectReason {
    /// Render a rejecting outcome. Accepting outcomes return `None`.
    pub fn from_outcome(input_idx: usize, outcome: &ExecutionOutcome) -> Option<Self> {
        let code = outcome.error_code()?;
        Some(RejectReason {
            input_idx,
            code: REJECT_INVALID,
            reason: format!("mandatory-script-verify-flag-failed ({})", code.message()),
        })
    }
}

/// Evaluate the script-path spend of one input.
///
/// # Arguments
/// * `tx` - The spending transaction; its inputs must carry source outputs
///   for OP_INOUT_AMOUNT.
/// * `input_idx` - The input to verify.
/// * `flags` - Verification flags.
///
/// # Returns
/// The execution outcome, or a `TransactionError` if the input does not
/// exist or its witness is not a script-path spend.
pub fn verify_input(
    tx: &Transaction,
    input_idx: usize,
    flags: ScriptFlags,
) -> Result<ExecutionOutcome, TransactionError> {
    let input = tx
        .inputs
        .get(input_idx)
        .ok_or(TransactionError::InputIndexOutOfRange {
            index: input_idx,
            count: tx.inputs.len(),
        })?;
    let spend = ScriptPathSpend::from_witness(&input.witness)?;

    let outcome = Engine::new().execute(
        spend.leaf_version(),
        &spend.script,
        &spend.stack,
        flags,
        Some(tx),
        input_idx,
    );
    debug!("input {} of {}: {}", input_idx, tx.inputs.len(), outcome);
    Ok(outcome)
}

/// Verify one input, turning a rejecting outcome into an error.
pub fn check_input(tx: &Transaction, input_idx: usize, flags: ScriptFlags) -> Result<(), TransactionError> {
    let outcome = verify_input(tx, input_idx, flags)?;
    match RejectReason::from_outcome(input_idx, &outcome) {
        Some(reject) => Err(reject.into()),
        None => Ok(()),
    }
}

/// Verify every input of a transaction in parallel.
///
/// # Returns
/// `Ok(())` if all inputs are accepted, otherwise the error of the
/// lowest-indexed failing input.
pub fn verify_all_inputs(tx: &Transaction, flags: ScriptFlags) -> Result<(), TransactionError> {
    let results: Vec<Result<(), TransactionError>> = (0..tx.inputs.len())
        .into_par_iter()
        .map(|idx| check_input(tx, idx, flags))
        .collect();
    results.into_iter().collect()
}
