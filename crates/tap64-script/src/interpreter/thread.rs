//! Script execution thread - the dispatcher loop.

use log::trace;

use crate::opcodes::*;

use super::config::Config;
use super::error::{InterpreterError, InterpreterErrorCode};
use super::flags::ScriptFlags;
use super::ops_crypto::HashType;
use super::outcome::ExecutionOutcome;
use super::parsed_opcode::*;
use super::scriptnum::ScriptNum;
use super::stack::*;
use super::TxContext;

/// The execution thread for one leaf script evaluation.
pub struct Thread<'a> {
    /// The main data stack, preloaded with the witness stack.
    pub dstack: Stack,
    /// The alternate stack used by OP_TOALTSTACK and OP_FROMALTSTACK.
    pub astack: Stack,
    /// Limits and enabled opcodes for the leaf version.
    pub cfg: Config,
    /// The parsed leaf script.
    pub script: ParsedScript,
    /// Index of the next opcode in `script`.
    pub pc: usize,
    /// Execution flags of the enclosing IF/NOTIF blocks, innermost last.
    pub cond_stack: Vec<bool>,
    /// Active script verification flags.
    pub flags: ScriptFlags,
    /// Optional transaction context for locktime checks and introspection.
    pub tx_context: Option<&'a dyn TxContext>,
    /// The transaction input index being verified.
    pub input_idx: usize,
}

impl<'a> Thread<'a> {
    /// Create a new execution thread over a parsed script and its witness stack.
    ///
    /// The witness stack (last element = top) is checked against the element
    /// count and element size limits before it becomes the initial data stack.
    pub fn new(
        script: ParsedScript,
        witness: &[Vec<u8>],
        cfg: Config,
        flags: ScriptFlags,
        tx_context: Option<&'a dyn TxContext>,
        input_idx: usize,
    ) -> Result<Self, InterpreterError> {
        if witness.len() > cfg.max_stack_size() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::StackSize,
                format!(
                    "witness stack has {} items, max allowed {}",
                    witness.len(),
                    cfg.max_stack_size()
                ),
            ));
        }
        if let Some(item) = witness.iter().find(|w| w.len() > cfg.max_script_element_size()) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::PushSize,
                format!(
                    "witness element size {} exceeds max allowed size {}",
                    item.len(),
                    cfg.max_script_element_size()
                ),
            ));
        }

        let verify_minimal_data = flags.has_flag(ScriptFlags::VERIFY_MINIMAL_DATA);
        let max_num_len = cfg.max_script_number_length();
        let oversize_code = if cfg.wide_arithmetic() {
            InterpreterErrorCode::ArithmeticOverflow
        } else {
            InterpreterErrorCode::NumberTooBig
        };

        let mut dstack = Stack::new(max_num_len, verify_minimal_data, oversize_code);
        dstack.set_stack(witness.to_vec());

        Ok(Thread {
            dstack,
            astack: Stack::alt(max_num_len, verify_minimal_data, oversize_code),
            cfg,
            script,
            pc: 0,
            cond_stack: Vec::new(),
            flags,
            tx_context,
            input_idx,
        })
    }

    /// Check if a specific script verification flag is set.
    pub fn has_flag(&self, flag: ScriptFlags) -> bool {
        self.flags.has_flag(flag)
    }

    /// Return true if every enclosing conditional branch is executing.
    pub fn is_branch_executing(&self) -> bool {
        self.cond_stack.iter().all(|&b| b)
    }

    /// Run until a terminal outcome.
    ///
    /// `Ok` carries `Success` or `ScriptFalse`; opcode failures are `Err`.
    pub fn execute(&mut self) -> Result<ExecutionOutcome, InterpreterError> {
        loop {
            let outcome = self.step()?;
            if outcome.is_terminal() {
                return Ok(outcome);
            }
        }
    }

    /// Execute one opcode, or evaluate the final stack once the script is exhausted.
    pub fn step(&mut self) -> Result<ExecutionOutcome, InterpreterError> {
        let Some(pop) = self.script.get(self.pc).cloned() else {
            return self.check_final_state();
        };

        self.execute_opcode(&pop)?;
        self.pc += 1;

        let combined = self.dstack.depth() + self.astack.depth();
        if combined > self.cfg.max_stack_size() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::StackSize,
                format!(
                    "combined stack size {} > max allowed {}",
                    combined,
                    self.cfg.max_stack_size()
                ),
            ));
        }

        Ok(ExecutionOutcome::Continue)
    }

    fn check_final_state(&self) -> Result<ExecutionOutcome, InterpreterError> {
        if !self.cond_stack.is_empty() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnbalancedConditional,
                "end of script reached in conditional execution".to_string(),
            ));
        }

        match self.dstack.depth() {
            0 => Ok(ExecutionOutcome::ScriptFalse),
            1 => {
                if as_bool(self.dstack.peek_byte_array(0)?) {
                    Ok(ExecutionOutcome::Success)
                } else {
                    Ok(ExecutionOutcome::ScriptFalse)
                }
            }
            n => Err(InterpreterError::new(
                InterpreterErrorCode::CleanStack,
                format!("stack contains {} unexpected items", n - 1),
            )),
        }
    }

    fn execute_opcode(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        if pop.data.len() > self.cfg.max_script_element_size() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::PushSize,
                format!(
                    "element size {} exceeds max allowed size {}",
                    pop.data.len(),
                    self.cfg.max_script_element_size()
                ),
            ));
        }

        let exec = self.is_branch_executing();
        if !exec && !pop.is_conditional() {
            return Ok(());
        }

        if exec && pop.is_data_push() && self.has_flag(ScriptFlags::VERIFY_MINIMAL_DATA) {
            pop.enforce_minimum_data_push()?;
        }

        trace!("executing {} at {} (depth {})", pop.name(), self.pc, self.dstack.depth());
        self.dispatch_opcode(pop)
    }

    fn dispatch_opcode(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        match pop.opcode {
            OP_0..=OP_PUSHDATA4 => {
                self.dstack.push_byte_array(pop.data.clone());
                Ok(())
            }
            OP_1NEGATE => {
                self.dstack.push_byte_array(vec![0x81]);
                Ok(())
            }
            op if (OP_1..=OP_16).contains(&op) => {
                self.dstack.push_byte_array(vec![op - (OP_1 - 1)]);
                Ok(())
            }
            OP_NOP => Ok(()),
            OP_IF => self.op_if(false),
            OP_NOTIF => self.op_if(true),
            OP_ELSE => self.op_else(pop),
            OP_ENDIF => self.op_endif(pop),
            OP_VERIFY => self.op_verify(pop),
            OP_RETURN => self.op_return(),

            // Locktime
            OP_CHECKLOCKTIMEVERIFY => self.op_check_locktime_verify(),
            OP_CHECKSEQUENCEVERIFY => self.op_check_sequence_verify(),

            // Stack ops
            OP_TOALTSTACK => self.op_to_alt_stack(),
            OP_FROMALTSTACK => self.op_from_alt_stack(),
            OP_2DROP => self.dstack.drop_n(2),
            OP_2DUP => self.dstack.dup_n(2),
            OP_3DUP => self.dstack.dup_n(3),
            OP_2OVER => self.dstack.over_n(2),
            OP_2ROT => self.dstack.rot_n(2),
            OP_2SWAP => self.dstack.swap_n(2),
            OP_IFDUP => self.op_ifdup(),
            OP_DEPTH => self.op_depth(),
            OP_DROP => self.dstack.drop_n(1),
            OP_DUP => self.dstack.dup_n(1),
            OP_NIP => self.dstack.nip_n(1).map(|_| ()),
            OP_OVER => self.dstack.over_n(1),
            OP_PICK => self.op_pick(),
            OP_ROLL => self.op_roll(),
            OP_ROT => self.dstack.rot_n(1),
            OP_SWAP => self.dstack.swap_n(1),
            OP_TUCK => self.dstack.tuck(),

            // Data
            OP_SIZE => self.op_size(),
            OP_EQUAL => self.op_equal(),
            OP_EQUALVERIFY => self.op_equalverify(pop),

            // Arithmetic
            OP_1ADD => self.op_unary_int(|m| m.checked_add(ScriptNum::ONE)),
            OP_1SUB => self.op_unary_int(|m| m.checked_sub(ScriptNum::ONE)),
            OP_NEGATE => self.op_unary_int(|m| Ok(m.negate())),
            OP_ABS => self.op_unary_int(|m| Ok(m.abs())),
            OP_NOT => self.op_not(),
            OP_0NOTEQUAL => self.op_0notequal(),
            OP_ADD => self.op_add(),
            OP_SUB => self.op_sub(),
            OP_MUL => self.op_mul(),
            OP_DIV => self.op_div(),
            OP_BOOLAND => self.op_bool_binop(|a, b| !a.is_zero() && !b.is_zero()),
            OP_BOOLOR => self.op_bool_binop(|a, b| !a.is_zero() || !b.is_zero()),
            OP_NUMEQUAL => self.op_bool_binop(|a, b| a == b),
            OP_NUMEQUALVERIFY => self.op_numequalverify(pop),
            OP_NUMNOTEQUAL => self.op_bool_binop(|a, b| a != b),
            OP_LESSTHAN => self.op_bool_binop(|a, b| a < b),
            OP_GREATERTHAN => self.op_bool_binop(|a, b| a > b),
            OP_LESSTHANOREQUAL => self.op_bool_binop(|a, b| a <= b),
            OP_GREATERTHANOREQUAL => self.op_bool_binop(|a, b| a >= b),
            OP_MIN => self.op_min(),
            OP_MAX => self.op_max(),
            OP_WITHIN => self.op_within(),

            // Crypto
            OP_RIPEMD160 => self.op_hash(HashType::Ripemd160),
            OP_SHA1 => self.op_hash(HashType::Sha1),
            OP_SHA256 => self.op_hash(HashType::Sha256),
            OP_HASH160 => self.op_hash(HashType::Hash160),
            OP_HASH256 => self.op_hash(HashType::Hash256),
            OP_CODESEPARATOR => Ok(()),
            OP_CHECKSIG | OP_CHECKSIGVERIFY | OP_CHECKSIGADD => self.op_signature_unsupported(pop),
            OP_CHECKMULTISIG | OP_CHECKMULTISIGVERIFY => self.op_checkmultisig(pop),

            // 64-bit leaf
            OP_INOUT_AMOUNT => self.op_inout_amount(),
            OP_SCRIPTNUMTOLE64 => self.op_scriptnum_to_le64(),
            OP_LE64TOSCRIPTNUM => self.op_le64_to_scriptnum(),
            OP_LE32TOLE64 => self.op_le32_to_le64(),

            // NOP opcodes
            OP_NOP1 | OP_NOP4 | OP_NOP5 | OP_NOP6 | OP_NOP7 | OP_NOP8 | OP_NOP9 | OP_NOP10 => {
                if self.has_flag(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS) {
                    return Err(InterpreterError::new(
                        InterpreterErrorCode::DiscourageUpgradableNops,
                        format!("{} reserved for soft-fork upgrades", pop.name()),
                    ));
                }
                Ok(())
            }

            // OP_VERIF, OP_VERNOTIF, OP_INVALIDOPCODE and anything not
            // filtered out as OP_SUCCESSx by the pre-scan.
            _ => Err(InterpreterError::new(
                InterpreterErrorCode::BadOpcode,
                format!("attempt to execute invalid opcode {}", pop.name()),
            )),
        }
    }
}
