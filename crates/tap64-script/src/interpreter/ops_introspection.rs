//! Transaction amount introspection.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::scriptnum::ScriptNum;
use super::thread::Thread;

/// Convert a 1-based script index into a 0-based position below `count`.
fn resolve_index(n: ScriptNum, count: usize, what: &str) -> Result<usize, InterpreterError> {
    let idx = n.value();
    match usize::try_from(idx) {
        Ok(i) if i >= 1 && i <= count => Ok(i - 1),
        _ => Err(InterpreterError::new(
            InterpreterErrorCode::IndexOutOfBounds,
            format!("{} index {} is out of range 1..={}", what, idx, count),
        )),
    }
}

impl<'a> Thread<'a> {
    /// `<in> <out> OP_INOUT_AMOUNT` replaces both indexes with the spent
    /// prevout amount of input `in` and then the amount of output `out`.
    pub(crate) fn op_inout_amount(&mut self) -> Result<(), InterpreterError> {
        let ctx = self.tx_context.ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                "no tx context for OP_INOUT_AMOUNT".to_string(),
            )
        })?;

        let out_num = self.dstack.pop_int()?;
        let in_num = self.dstack.pop_int()?;
        let in_idx = resolve_index(in_num, ctx.input_count(), "input")?;
        let out_idx = resolve_index(out_num, ctx.output_count(), "output")?;

        let in_amount = ctx.input_amount(in_idx).ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                format!("previous output of input {} is unknown", in_idx),
            )
        })?;
        let out_amount = ctx.output_amount(out_idx).ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                format!("amount of output {} is unknown", out_idx),
            )
        })?;

        self.dstack.push_int(ScriptNum::from_amount(in_amount)?);
        self.dstack.push_int(ScriptNum::from_amount(out_amount)?);
        Ok(())
    }
}
