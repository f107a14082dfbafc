//! Flow control and locktime operations for the script interpreter.

use super::config::LOCKTIME_NUMBER_LENGTH;
use super::error::{InterpreterError, InterpreterErrorCode};
use super::flags::ScriptFlags;
use super::parsed_opcode::ParsedOpcode;
use super::scriptnum::ScriptNum;
use super::thread::Thread;
use super::TxContext;

/// Lock time threshold (block height below, timestamp at or above).
const LOCK_TIME_THRESHOLD: i64 = 500_000_000;

/// Sequence number of a finalized input.
const MAX_TX_IN_SEQUENCE_NUM: u32 = 0xffffffff;
/// Sequence lock time disabled bit.
const SEQUENCE_LOCK_TIME_DISABLED: i64 = 1 << 31;
/// Sequence lock time is seconds flag.
const SEQUENCE_LOCK_TIME_IS_SECONDS: i64 = 1 << 22;
/// Sequence lock time mask.
const SEQUENCE_LOCK_TIME_MASK: i64 = 0x0000ffff;

fn unbalanced(pop: &ParsedOpcode) -> InterpreterError {
    InterpreterError::new(
        InterpreterErrorCode::UnbalancedConditional,
        format!(
            "encountered opcode {} with no matching opcode to begin conditional execution",
            pop.name()
        ),
    )
}

impl<'a> Thread<'a> {
    /// Pop an IF/NOTIF argument. Only the empty string and `0x01` are accepted.
    fn pop_if_bool(&mut self) -> Result<bool, InterpreterError> {
        if self.dstack.depth() == 0 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnbalancedConditional,
                "conditional opcode with empty stack".to_string(),
            ));
        }
        let b = self.dstack.pop_byte_array()?;
        match b.as_slice() {
            [] => Ok(false),
            [1] => Ok(true),
            _ => Err(InterpreterError::new(
                InterpreterErrorCode::MinimalIf,
                format!("conditional argument {} is not minimal", hex::encode(&b)),
            )),
        }
    }

    pub(crate) fn op_if(&mut self, negate: bool) -> Result<(), InterpreterError> {
        let taken = if self.is_branch_executing() {
            self.pop_if_bool()? != negate
        } else {
            false
        };
        self.cond_stack.push(taken);
        Ok(())
    }

    pub(crate) fn op_else(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        let top = self.cond_stack.last_mut().ok_or_else(|| unbalanced(pop))?;
        *top = !*top;
        Ok(())
    }

    pub(crate) fn op_endif(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.cond_stack.pop().ok_or_else(|| unbalanced(pop))?;
        Ok(())
    }

    pub(crate) fn op_verify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.abstract_verify(pop, InterpreterErrorCode::Verify)
    }

    pub(crate) fn abstract_verify(
        &mut self,
        pop: &ParsedOpcode,
        code: InterpreterErrorCode,
    ) -> Result<(), InterpreterError> {
        let verified = self.dstack.pop_bool()?;
        if !verified {
            return Err(InterpreterError::new(code, format!("{} failed", pop.name())));
        }
        Ok(())
    }

    pub(crate) fn op_return(&mut self) -> Result<(), InterpreterError> {
        Err(InterpreterError::new(
            InterpreterErrorCode::OpReturn,
            "script returned early".to_string(),
        ))
    }

    fn upgradable_nop(&self, name: &str) -> Result<(), InterpreterError> {
        if self.has_flag(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::DiscourageUpgradableNops,
                format!("{} reserved for soft-fork upgrades", name),
            ));
        }
        Ok(())
    }

    fn require_context(&self, opcode: &str) -> Result<&'a dyn TxContext, InterpreterError> {
        self.tx_context.ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                format!("no tx context for {}", opcode),
            )
        })
    }

    fn current_sequence(&self, ctx: &dyn TxContext) -> Result<u32, InterpreterError> {
        ctx.input_sequence(self.input_idx).ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidParams,
                format!("input {} is not part of the transaction", self.input_idx),
            )
        })
    }

    /// Read the top stack element as a locktime without popping it.
    fn peek_locktime(&self) -> Result<i64, InterpreterError> {
        let so = self.dstack.peek_byte_array(0)?;
        let n = ScriptNum::from_bytes(so, LOCKTIME_NUMBER_LENGTH, self.dstack.verify_minimal_data)?;
        if n.is_negative() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NegativeLockTime,
                format!("negative lock time: {}", n),
            ));
        }
        Ok(n.value())
    }

    pub(crate) fn op_check_locktime_verify(&mut self) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_CHECKLOCKTIMEVERIFY) {
            return self.upgradable_nop("OP_NOP2");
        }

        let ctx = self.require_context("OP_CHECKLOCKTIMEVERIFY")?;
        let lock_time = self.peek_locktime()?;

        verify_lock_time(i64::from(ctx.lock_time()), LOCK_TIME_THRESHOLD, lock_time)?;

        if self.current_sequence(ctx)? == MAX_TX_IN_SEQUENCE_NUM {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnsatisfiedLockTime,
                "transaction input is finalized".to_string(),
            ));
        }

        Ok(())
    }

    pub(crate) fn op_check_sequence_verify(&mut self) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_CHECKSEQUENCEVERIFY) {
            return self.upgradable_nop("OP_NOP3");
        }

        let ctx = self.require_context("OP_CHECKSEQUENCEVERIFY")?;
        let sequence = self.peek_locktime()?;

        if sequence & SEQUENCE_LOCK_TIME_DISABLED != 0 {
            return Ok(());
        }

        if ctx.tx_version() < 2 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnsatisfiedLockTime,
                format!("invalid transaction version: {}", ctx.tx_version()),
            ));
        }

        let tx_sequence = i64::from(self.current_sequence(ctx)?);
        if tx_sequence & SEQUENCE_LOCK_TIME_DISABLED != 0 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnsatisfiedLockTime,
                format!(
                    "transaction sequence has sequence locktime disabled bit set: 0x{:x}",
                    tx_sequence
                ),
            ));
        }

        let lock_time_mask = SEQUENCE_LOCK_TIME_IS_SECONDS | SEQUENCE_LOCK_TIME_MASK;
        verify_lock_time(
            tx_sequence & lock_time_mask,
            SEQUENCE_LOCK_TIME_IS_SECONDS,
            sequence & lock_time_mask,
        )
    }
}

/// Compare a stack locktime against the transaction's.
///
/// Both values must be on the same side of `threshold`, and the stack value
/// may not exceed the transaction value.
pub(crate) fn verify_lock_time(
    tx_lock_time: i64,
    threshold: i64,
    lock_time: i64,
) -> Result<(), InterpreterError> {
    if (tx_lock_time < threshold) != (lock_time < threshold) {
        return Err(InterpreterError::new(
            InterpreterErrorCode::UnsatisfiedLockTime,
            format!(
                "mismatched locktime types: tx locktime {}, stack locktime {}",
                tx_lock_time, lock_time
            ),
        ));
    }
    if lock_time > tx_lock_time {
        return Err(InterpreterError::new(
            InterpreterErrorCode::UnsatisfiedLockTime,
            format!(
                "locktime is greater than the transaction locktime: {} > {}",
                lock_time, tx_lock_time
            ),
        ));
    }
    Ok(())
}
