//! Tapscript interpreter with a 64-bit arithmetic leaf version.
//!
//! Evaluates a single leaf script against its witness stack. Two leaf
//! versions are understood:
//!
//! - `0xc0`, base tapscript with 4-byte arithmetic operands.
//! - `0xc2`, the 64-bit leaf: 8-byte operands, exact overflow detection,
//!   OP_MUL, Euclidean OP_DIV, OP_INOUT_AMOUNT and the LE64 conversions.
//!
//! Any other leaf version succeeds unconditionally unless discouraged.
//!
//! # Architecture
//!
//! The interpreter does not depend on the transaction crate. Callers that
//! need locktime checks or amount introspection provide a [`TxContext`]
//! implementation.
//!
//! # Example
//!
//! ```ignore
//! use tap64_script::interpreter::{Engine, ExecutionOutcome, ScriptFlags, LEAF_VERSION_TAPSCRIPT_64BIT};
//!
//! let script = Script::from_asm("OP_MUL OP_6 OP_EQUAL")?;
//! let outcome = Engine::new().execute(
//!     LEAF_VERSION_TAPSCRIPT_64BIT,
//!     &script,
//!     &[vec![2], vec![3]],
//!     ScriptFlags::STANDARD,
//!     None,
//!     0,
//! );
//! assert_eq!(outcome, ExecutionOutcome::Success);
//! ```

pub mod config;
pub mod error;
pub mod flags;
pub mod outcome;
pub mod parsed_opcode;
pub mod scriptnum;
pub mod stack;
pub mod thread;

mod ops_arithmetic;
mod ops_crypto;
mod ops_data;
mod ops_flow;
mod ops_introspection;
mod ops_stack;

pub use config::{
    Config, LeafVersion, LEAF_VERSION_TAPSCRIPT, LEAF_VERSION_TAPSCRIPT_64BIT, MAX_SCRIPT_ELEMENT_SIZE,
    MAX_STACK_SIZE,
};
pub use error::{InterpreterError, InterpreterErrorCode, Severity};
pub use flags::ScriptFlags;
pub use outcome::ExecutionOutcome;
pub use parsed_opcode::{parse_script, ParsedOpcode, ParsedScript, ScriptScan};
pub use scriptnum::ScriptNum;
pub use stack::Stack;

use log::{debug, trace};

use crate::Script;
use thread::Thread;

/// Transaction data visible to a script.
///
/// Indexes are 0-based. `None` means the index is not part of the
/// transaction or the amount is not known to the caller.
pub trait TxContext: Sync {
    /// Get the transaction lock time.
    fn lock_time(&self) -> u32;

    /// Get the transaction version.
    fn tx_version(&self) -> u32;

    /// Get the sequence number of the given input.
    fn input_sequence(&self, input_idx: usize) -> Option<u32>;

    fn input_count(&self) -> usize;

    fn output_count(&self) -> usize;

    /// Amount of the previous output spent by the given input.
    fn input_amount(&self, input_idx: usize) -> Option<u64>;

    fn output_amount(&self, output_idx: usize) -> Option<u64>;
}

/// The script execution engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Engine
    }

    /// Evaluate a leaf script and classify the result.
    ///
    /// # Arguments
    /// * `leaf_version` - Leaf version byte from the control block.
    /// * `script` - The leaf script.
    /// * `witness` - Initial stack, last element on top.
    /// * `flags` - Verification flags.
    /// * `tx_context` - Optional transaction context for locktime and introspection opcodes.
    /// * `input_idx` - The input index being verified.
    pub fn execute(
        &self,
        leaf_version: u8,
        script: &Script,
        witness: &[Vec<u8>],
        flags: ScriptFlags,
        tx_context: Option<&dyn TxContext>,
        input_idx: usize,
    ) -> ExecutionOutcome {
        let outcome = self
            .evaluate(leaf_version, script, witness, flags, tx_context, input_idx)
            .unwrap_or_else(|err| {
                debug!("input {} rejected: {}", input_idx, err);
                ExecutionOutcome::from_error(&err)
            });
        debug!("input {} leaf 0x{:02x}: {:?}", input_idx, leaf_version, outcome);
        outcome
    }

    /// Like [`Engine::execute`], but every rejection is an error.
    ///
    /// A script that finishes with a false or empty stack is reported as
    /// `EvalFalse`.
    pub fn verify(
        &self,
        leaf_version: u8,
        script: &Script,
        witness: &[Vec<u8>],
        flags: ScriptFlags,
        tx_context: Option<&dyn TxContext>,
        input_idx: usize,
    ) -> Result<(), InterpreterError> {
        match self.evaluate(leaf_version, script, witness, flags, tx_context, input_idx)? {
            ExecutionOutcome::Success => Ok(()),
            _ => Err(InterpreterError::new(
                InterpreterErrorCode::EvalFalse,
                "false stack entry at end of script execution".to_string(),
            )),
        }
    }

    fn evaluate(
        &self,
        leaf_version: u8,
        script: &Script,
        witness: &[Vec<u8>],
        flags: ScriptFlags,
        tx_context: Option<&dyn TxContext>,
        input_idx: usize,
    ) -> Result<ExecutionOutcome, InterpreterError> {
        let Some(cfg) = Config::for_leaf_version(leaf_version) else {
            if flags.has_flag(ScriptFlags::DISCOURAGE_UPGRADABLE_TAPROOT_VERSION) {
                return Err(InterpreterError::new(
                    InterpreterErrorCode::DiscourageUpgradableTaprootVersion,
                    format!("leaf version 0x{:02x} is reserved for upgrades", leaf_version),
                ));
            }
            trace!("unknown leaf version 0x{:02x}, accepting", leaf_version);
            return Ok(ExecutionOutcome::Success);
        };

        let parsed = match parse_script(script, &cfg)? {
            ScriptScan::Parsed(parsed) => parsed,
            ScriptScan::OpSuccess(op) => {
                if flags.has_flag(ScriptFlags::DISCOURAGE_OP_SUCCESS) {
                    return Err(InterpreterError::new(
                        InterpreterErrorCode::DiscourageOpSuccess,
                        format!("OP_SUCCESS{} reserved for soft-fork upgrades", op),
                    ));
                }
                trace!("OP_SUCCESS{} found, accepting", op);
                return Ok(ExecutionOutcome::Success);
            }
        };

        let mut thread = Thread::new(parsed, witness, cfg, flags, tx_context, input_idx)?;
        thread.execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::*;

    const ONE_BTC: u64 = 100_000_000;

    struct MockContext {
        lock_time: u32,
        version: u32,
        sequences: Vec<u32>,
        input_amounts: Vec<Option<u64>>,
        output_amounts: Vec<u64>,
    }

    impl MockContext {
        /// One input funded with 2 BTC, paying `spend` plus change minus a 1000 sat fee.
        fn funding(spend: u64) -> Self {
            let in_total = 2 * ONE_BTC;
            MockContext {
                lock_time: 0,
                version: 2,
                sequences: vec![0xffff_fffe],
                input_amounts: vec![Some(in_total)],
                output_amounts: vec![spend, in_total - spend - 1000],
            }
        }
    }

    impl TxContext for MockContext {
        fn lock_time(&self) -> u32 {
            self.lock_time
        }
        fn tx_version(&self) -> u32 {
            self.version
        }
        fn input_sequence(&self, input_idx: usize) -> Option<u32> {
            self.sequences.get(input_idx).copied()
        }
        fn input_count(&self) -> usize {
            self.input_amounts.len()
        }
        fn output_count(&self) -> usize {
            self.output_amounts.len()
        }
        fn input_amount(&self, input_idx: usize) -> Option<u64> {
            self.input_amounts.get(input_idx).copied().flatten()
        }
        fn output_amount(&self, output_idx: usize) -> Option<u64> {
            self.output_amounts.get(output_idx).copied()
        }
    }

    fn asm(s: &str) -> Script {
        Script::from_asm(s).unwrap()
    }

    fn num(v: i64) -> Vec<u8> {
        ScriptNum::new(v).unwrap().to_bytes()
    }

    fn run_with(
        leaf: u8,
        script: &Script,
        witness: &[Vec<u8>],
        flags: ScriptFlags,
        ctx: Option<&dyn TxContext>,
    ) -> ExecutionOutcome {
        Engine::new().execute(leaf, script, witness, flags, ctx, 0)
    }

    fn run64(script: &Script, witness: &[Vec<u8>]) -> ExecutionOutcome {
        run_with(LEAF_VERSION_TAPSCRIPT_64BIT, script, witness, ScriptFlags::MANDATORY, None)
    }

    fn script_err(code: InterpreterErrorCode) -> ExecutionOutcome {
        ExecutionOutcome::ScriptError(code)
    }

    // ---- result classification ----

    #[test]
    fn test_op_1_op_1_op_equal() {
        let outcome = run64(&Script::from_bytes(&[OP_1, OP_1, OP_EQUAL]), &[]);
        assert_eq!(outcome, ExecutionOutcome::Success);
    }

    #[test]
    fn test_empty_script_and_stack_is_false() {
        assert_eq!(run64(&Script::new(), &[]), ExecutionOutcome::ScriptFalse);
        assert_eq!(run64(&Script::from_bytes(&[OP_0]), &[]), ExecutionOutcome::ScriptFalse);
        assert_eq!(run64(&Script::new(), &[vec![0x80]]), ExecutionOutcome::ScriptFalse);
    }

    #[test]
    fn test_clean_stack() {
        let outcome = run64(&Script::from_bytes(&[OP_1, OP_1]), &[]);
        assert_eq!(outcome, script_err(InterpreterErrorCode::CleanStack));
    }

    #[test]
    fn test_verify_reports_eval_false() {
        let err = Engine::new()
            .verify(LEAF_VERSION_TAPSCRIPT_64BIT, &Script::new(), &[], ScriptFlags::NONE, None, 0)
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::EvalFalse);

        assert!(Engine::new()
            .verify(LEAF_VERSION_TAPSCRIPT_64BIT, &asm("OP_1"), &[], ScriptFlags::NONE, None, 0)
            .is_ok());
    }

    // ---- leaf versions and OP_SUCCESS ----

    #[test]
    fn test_unknown_leaf_version() {
        let script = Script::from_bytes(&[OP_RETURN]);
        assert_eq!(run_with(0xc4, &script, &[], ScriptFlags::NONE, None), ExecutionOutcome::Success);
        assert_eq!(
            run_with(0xc4, &script, &[], ScriptFlags::STANDARD, None),
            script_err(InterpreterErrorCode::DiscourageUpgradableTaprootVersion)
        );
    }

    #[test]
    fn test_mul_is_op_success_in_base_leaf() {
        let script = asm("OP_MUL OP_0");
        assert_eq!(
            run_with(LEAF_VERSION_TAPSCRIPT, &script, &[], ScriptFlags::MANDATORY, None),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run_with(LEAF_VERSION_TAPSCRIPT, &script, &[], ScriptFlags::STANDARD, None),
            script_err(InterpreterErrorCode::DiscourageOpSuccess)
        );
        // In the 64-bit leaf OP_MUL executes and underflows the empty stack.
        assert_eq!(run64(&script, &[]), script_err(InterpreterErrorCode::InvalidStackOperation));
    }

    #[test]
    fn test_op_success_anywhere_wins() {
        // OP_SUCCESS187 after an OP_RETURN still makes the script succeed.
        let script = Script::from_bytes(&[OP_RETURN, 0xbc]);
        assert_eq!(run64(&script, &[]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_invalid_opcode_is_bad_opcode() {
        let outcome = run64(&Script::from_bytes(&[OP_1, OP_INVALIDOPCODE]), &[]);
        assert_eq!(outcome, script_err(InterpreterErrorCode::BadOpcode));
    }

    #[test]
    fn test_verif_in_unexecuted_branch() {
        let script = Script::from_bytes(&[OP_0, OP_IF, OP_VERIF, OP_ENDIF, OP_1]);
        assert_eq!(run64(&script, &[]), script_err(InterpreterErrorCode::BadOpcode));
    }

    // ---- 64-bit arithmetic ----

    #[test]
    fn test_add_sub_64bit() {
        let big = i64::MAX - 1;
        let script = asm("OP_1 OP_ADD OP_1 OP_SUB");
        let mut expect = script.clone();
        expect.append_push_data(&num(big)).unwrap();
        expect.append_opcodes(&[OP_EQUAL]).unwrap();
        assert_eq!(run64(&expect, &[num(big)]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_add_overflow_is_consensus_error() {
        let outcome = run64(&asm("OP_1 OP_ADD"), &[num(i64::MAX)]);
        assert_eq!(
            outcome,
            ExecutionOutcome::ConsensusError(InterpreterErrorCode::ArithmeticOverflow)
        );
        let outcome = run64(&asm("OP_1SUB"), &[num(-i64::MAX)]);
        assert_eq!(
            outcome,
            ExecutionOutcome::ConsensusError(InterpreterErrorCode::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_mul() {
        assert_eq!(run64(&asm("OP_MUL OP_12 OP_EQUAL"), &[num(3), num(4)]), ExecutionOutcome::Success);
        let outcome = run64(&asm("OP_2 OP_MUL"), &[num(i64::MAX / 2 + 1)]);
        assert_eq!(
            outcome,
            ExecutionOutcome::ConsensusError(InterpreterErrorCode::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_div_pushes_quotient_then_remainder() {
        // -7 = -4 * 2 + 1
        let script = asm("OP_DIV OP_1 OP_EQUALVERIFY 84 OP_EQUAL");
        assert_eq!(run64(&script, &[num(-7), num(2)]), ExecutionOutcome::Success);

        // 7 / -2 = -3 remainder 1
        let script = asm("OP_DIV OP_1 OP_EQUALVERIFY 83 OP_EQUAL");
        assert_eq!(run64(&script, &[num(7), num(-2)]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_div_by_zero() {
        let outcome = run64(&asm("OP_DIV"), &[num(6), vec![]]);
        assert_eq!(outcome, script_err(InterpreterErrorCode::DivideByZero));
        assert_eq!(outcome.to_string(), "Arithmetic opcode error");
    }

    #[test]
    fn test_negate_min_is_max() {
        let mut script = asm("OP_NEGATE");
        script.append_push_data(&num(i64::MAX)).unwrap();
        script.append_opcodes(&[OP_EQUAL]).unwrap();
        assert_eq!(run64(&script, &[num(-i64::MAX)]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_oversize_operand() {
        let nine = vec![1, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            run64(&asm("OP_1ADD"), &[nine.clone()]),
            ExecutionOutcome::ConsensusError(InterpreterErrorCode::ArithmeticOverflow)
        );
        // Five-byte operands are too big for the base leaf.
        let five = vec![1, 0, 0, 0, 1];
        assert_eq!(
            run_with(LEAF_VERSION_TAPSCRIPT, &asm("OP_1ADD"), &[five.clone()], ScriptFlags::NONE, None),
            script_err(InterpreterErrorCode::NumberTooBig)
        );
        assert_eq!(run64(&asm("OP_1ADD OP_DROP OP_1"), &[five]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_comparisons_and_within() {
        assert_eq!(run64(&asm("OP_LESSTHAN"), &[num(-5), num(3)]), ExecutionOutcome::Success);
        assert_eq!(run64(&asm("OP_GREATERTHAN"), &[num(-5), num(3)]), ExecutionOutcome::ScriptFalse);
        assert_eq!(run64(&asm("OP_WITHIN"), &[num(3), num(3), num(4)]), ExecutionOutcome::Success);
        assert_eq!(run64(&asm("OP_WITHIN"), &[num(4), num(3), num(4)]), ExecutionOutcome::ScriptFalse);
        // An empty range holds nothing, not even its own bound.
        assert_eq!(run64(&asm("OP_WITHIN"), &[num(3), num(3), num(3)]), ExecutionOutcome::ScriptFalse);
        assert_eq!(run64(&asm("OP_WITHIN"), &[num(-1), num(-1), num(-1)]), ExecutionOutcome::ScriptFalse);
        assert_eq!(
            run64(&asm("OP_2 OP_3 OP_WITHIN"), &[]),
            script_err(InterpreterErrorCode::InvalidStackOperation)
        );
        assert_eq!(
            run64(&asm("OP_MIN OP_2 OP_NUMEQUALVERIFY OP_1"), &[num(7), num(2)]),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_MAX OP_2 OP_NUMEQUALVERIFY OP_1"), &[num(7), num(2)]),
            script_err(InterpreterErrorCode::NumEqualVerify)
        );
    }

    #[test]
    fn test_booland_boolor_not() {
        assert_eq!(run64(&asm("OP_BOOLAND"), &[num(1), vec![]]), ExecutionOutcome::ScriptFalse);
        assert_eq!(run64(&asm("OP_BOOLOR"), &[num(1), vec![]]), ExecutionOutcome::Success);
        assert_eq!(run64(&asm("OP_NOT"), &[vec![]]), ExecutionOutcome::Success);
        assert_eq!(run64(&asm("OP_0NOTEQUAL"), &[num(-9)]), ExecutionOutcome::Success);
    }

    // ---- LE64 conversions ----

    #[test]
    fn test_le64_conversions() {
        let le = hex::encode(5i64.to_le_bytes());
        let script = asm(&format!("OP_SCRIPTNUMTOLE64 {} OP_EQUAL", le));
        assert_eq!(run64(&script, &[num(5)]), ExecutionOutcome::Success);

        let script = asm("OP_LE64TOSCRIPTNUM 85 OP_EQUAL");
        assert_eq!(run64(&script, &[(-5i64).to_le_bytes().to_vec()]), ExecutionOutcome::Success);

        let script = asm(&format!("OP_LE32TOLE64 {} OP_EQUAL", hex::encode((-2i64).to_le_bytes())));
        assert_eq!(run64(&script, &[vec![0xfe, 0xff, 0xff, 0xff]]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_le64_wrong_length() {
        assert_eq!(
            run64(&asm("OP_LE64TOSCRIPTNUM"), &[vec![0; 7]]),
            script_err(InterpreterErrorCode::InvalidOperandLength)
        );
        assert_eq!(
            run64(&asm("OP_LE32TOLE64"), &[vec![0; 8]]),
            script_err(InterpreterErrorCode::InvalidOperandLength)
        );
        assert_eq!(
            run64(&asm("OP_LE64TOSCRIPTNUM"), &[i64::MIN.to_le_bytes().to_vec()]),
            ExecutionOutcome::ConsensusError(InterpreterErrorCode::ArithmeticOverflow)
        );
    }

    // ---- stack shape ----

    #[test]
    fn test_depth_and_size() {
        assert_eq!(
            run64(&asm("OP_DEPTH OP_3 OP_EQUALVERIFY OP_2DROP OP_DROP OP_1"), &[vec![], vec![], vec![]]),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_SIZE OP_4 OP_EQUALVERIFY OP_DROP OP_1"), &[vec![9; 4]]),
            ExecutionOutcome::Success
        );
        assert_eq!(run64(&asm("OP_SIZE"), &[]), script_err(InterpreterErrorCode::InvalidStackOperation));
    }

    #[test]
    fn test_pick_roll() {
        let witness = [num(7), num(8), num(9)];
        assert_eq!(
            run64(&asm("OP_2 OP_PICK OP_7 OP_EQUALVERIFY OP_2DROP OP_DROP OP_1"), &witness),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_2 OP_ROLL OP_7 OP_EQUALVERIFY OP_2DROP OP_1"), &witness),
            ExecutionOutcome::Success
        );
        // Index 0 addresses the top item.
        assert_eq!(run64(&asm("OP_1 OP_0 OP_PICK OP_EQUAL"), &[]), ExecutionOutcome::Success);
        assert_eq!(
            run64(&asm("OP_2 OP_1 OP_0 OP_ROLL OP_1 OP_EQUALVERIFY OP_2 OP_EQUAL"), &[]),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_2 OP_1 OP_1 OP_ROLL OP_2 OP_EQUALVERIFY OP_1 OP_EQUAL"), &[]),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_3 OP_PICK"), &witness),
            script_err(InterpreterErrorCode::InvalidStackOperation)
        );
        assert_eq!(
            run64(&asm("OP_1NEGATE OP_ROLL"), &witness),
            script_err(InterpreterErrorCode::InvalidStackOperation)
        );
        // Index operands that are too long are NumberTooBig, not overflow.
        assert_eq!(
            run64(&asm("000000000000000001 OP_PICK"), &witness),
            script_err(InterpreterErrorCode::NumberTooBig)
        );
    }

    #[test]
    fn test_alt_stack() {
        assert_eq!(
            run64(&asm("OP_TOALTSTACK OP_FROMALTSTACK"), &[num(1)]),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_FROMALTSTACK"), &[]),
            script_err(InterpreterErrorCode::InvalidAltStackOperation)
        );
    }

    #[test]
    fn test_two_item_ops() {
        let witness = [num(1), num(2)];
        assert_eq!(
            run64(&asm("OP_SWAP OP_1 OP_EQUALVERIFY OP_2 OP_EQUAL"), &witness),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_TUCK OP_2 OP_EQUALVERIFY OP_1 OP_EQUALVERIFY OP_2 OP_EQUAL"), &witness),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_2DUP OP_2DROP OP_NIP OP_2 OP_EQUAL"), &witness),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run64(&asm("OP_ROT"), &witness),
            script_err(InterpreterErrorCode::InvalidStackOperation)
        );
    }

    #[test]
    fn test_ifdup() {
        assert_eq!(run64(&asm("OP_IFDUP OP_EQUAL"), &[num(1)]), ExecutionOutcome::Success);
        assert_eq!(run64(&asm("OP_IFDUP OP_DEPTH OP_1 OP_EQUALVERIFY"), &[vec![]]), ExecutionOutcome::ScriptFalse);
    }

    // ---- limits ----

    #[test]
    fn test_witness_limits() {
        let witness = vec![vec![1]; MAX_STACK_SIZE + 1];
        assert_eq!(run64(&Script::new(), &witness), script_err(InterpreterErrorCode::StackSize));

        let witness = vec![vec![0; MAX_SCRIPT_ELEMENT_SIZE + 1]];
        assert_eq!(run64(&Script::new(), &witness), script_err(InterpreterErrorCode::PushSize));
    }

    #[test]
    fn test_stack_size_limit() {
        let witness = vec![vec![1]; MAX_STACK_SIZE];
        assert_eq!(
            run64(&asm("OP_TOALTSTACK OP_1 OP_1"), &witness),
            script_err(InterpreterErrorCode::StackSize)
        );
    }

    #[test]
    fn test_push_size_limit() {
        let mut script = Script::new();
        script.append_push_data(&[0xab; MAX_SCRIPT_ELEMENT_SIZE + 1]).unwrap();
        assert_eq!(run64(&script, &[]), script_err(InterpreterErrorCode::PushSize));
    }

    #[test]
    fn test_minimal_data() {
        let script = Script::from_bytes(&[OP_PUSHDATA1, 0x01, 0x05]);
        assert_eq!(run64(&script, &[]), ExecutionOutcome::Success);
        assert_eq!(
            run_with(LEAF_VERSION_TAPSCRIPT_64BIT, &script, &[], ScriptFlags::VERIFY_MINIMAL_DATA, None),
            script_err(InterpreterErrorCode::MinimalData)
        );
        assert_eq!(
            run_with(
                LEAF_VERSION_TAPSCRIPT_64BIT,
                &asm("OP_1ADD"),
                &[vec![0x05, 0x00]],
                ScriptFlags::VERIFY_MINIMAL_DATA,
                None
            ),
            script_err(InterpreterErrorCode::MinimalData)
        );
    }

    // ---- flow control ----

    #[test]
    fn test_if_else_endif() {
        let script = asm("OP_IF OP_2 OP_ELSE OP_3 OP_ENDIF OP_3 OP_EQUAL");
        assert_eq!(run64(&script, &[vec![]]), ExecutionOutcome::Success);
        assert_eq!(run64(&script, &[vec![1]]), ExecutionOutcome::ScriptFalse);

        let script = asm("OP_NOTIF OP_1 OP_ELSE OP_0 OP_ENDIF");
        assert_eq!(run64(&script, &[vec![]]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_nested_if_in_unexecuted_branch() {
        let script = asm("OP_0 OP_IF OP_IF OP_RETURN OP_ENDIF OP_RETURN OP_ENDIF OP_1");
        assert_eq!(run64(&script, &[]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_minimal_if() {
        let script = asm("OP_IF OP_1 OP_ENDIF");
        assert_eq!(run64(&script, &[vec![2]]), script_err(InterpreterErrorCode::MinimalIf));
        assert_eq!(run64(&script, &[vec![1, 0]]), script_err(InterpreterErrorCode::MinimalIf));
        assert_eq!(run64(&script, &[vec![1]]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_unbalanced_conditionals() {
        for s in ["OP_1 OP_IF", "OP_ELSE", "OP_1 OP_ENDIF", "OP_IF OP_ENDIF"] {
            assert_eq!(
                run64(&asm(s), &[]),
                script_err(InterpreterErrorCode::UnbalancedConditional),
                "{}",
                s
            );
        }
    }

    #[test]
    fn test_op_return_and_verify() {
        assert_eq!(run64(&asm("OP_1 OP_RETURN"), &[]), script_err(InterpreterErrorCode::OpReturn));
        assert_eq!(run64(&asm("OP_0 OP_VERIFY OP_1"), &[]), script_err(InterpreterErrorCode::Verify));
        assert_eq!(run64(&asm("OP_1 OP_2 OP_EQUALVERIFY"), &[]), script_err(InterpreterErrorCode::EqualVerify));
    }

    // ---- signature opcodes ----

    #[test]
    fn test_signature_opcodes() {
        let witness = [vec![0; 64], vec![2; 32]];
        for op in ["OP_CHECKSIG", "OP_CHECKSIGVERIFY"] {
            assert_eq!(run64(&asm(op), &witness), script_err(InterpreterErrorCode::UnsupportedOpcode));
        }
        assert_eq!(
            run64(&asm("OP_0 OP_CHECKSIGADD"), &witness),
            script_err(InterpreterErrorCode::UnsupportedOpcode)
        );
        assert_eq!(
            run64(&asm("OP_CHECKMULTISIG"), &witness),
            script_err(InterpreterErrorCode::TapscriptCheckMultiSig)
        );
        assert_eq!(run64(&asm("OP_CODESEPARATOR OP_1"), &[]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_hash_ops() {
        let digest = hex::encode(sha256(b"abc"));
        let script = asm(&format!("OP_SHA256 {} OP_EQUAL", digest));
        assert_eq!(run64(&script, &[b"abc".to_vec()]), ExecutionOutcome::Success);
        assert_eq!(run64(&asm("OP_HASH160 OP_SIZE OP_NIP 14 OP_EQUAL"), &[vec![]]), ExecutionOutcome::Success);
    }

    fn sha256(data: &[u8]) -> Vec<u8> {
        use sha2::{Digest, Sha256};
        Sha256::digest(data).to_vec()
    }

    // ---- upgradable NOPs ----

    #[test]
    fn test_upgradable_nops() {
        assert_eq!(run64(&asm("OP_NOP1 OP_NOP10 OP_1"), &[]), ExecutionOutcome::Success);
        assert_eq!(
            run_with(LEAF_VERSION_TAPSCRIPT_64BIT, &asm("OP_NOP4 OP_1"), &[], ScriptFlags::STANDARD, None),
            script_err(InterpreterErrorCode::DiscourageUpgradableNops)
        );
    }

    // ---- OP_INOUT_AMOUNT ----

    fn inout_script() -> Script {
        asm("OP_INOUT_AMOUNT OP_SUB 00e1f505 OP_GREATERTHANOREQUAL")
    }

    fn run_inout(ctx: &MockContext, witness: &[Vec<u8>]) -> ExecutionOutcome {
        run_with(LEAF_VERSION_TAPSCRIPT_64BIT, &inout_script(), witness, ScriptFlags::STANDARD, Some(ctx))
    }

    #[test]
    fn test_inout_amount_pass() {
        let ctx = MockContext::funding(ONE_BTC);
        assert_eq!(run_inout(&ctx, &[num(1), num(1)]), ExecutionOutcome::Success);
    }

    #[test]
    fn test_inout_amount_overspend() {
        let ctx = MockContext::funding(ONE_BTC + 1);
        assert_eq!(run_inout(&ctx, &[num(1), num(1)]), ExecutionOutcome::ScriptFalse);
    }

    #[test]
    fn test_inout_amount_index_out_of_bounds() {
        let ctx = MockContext::funding(ONE_BTC);
        for witness in [[num(2), num(1)], [num(1), num(4)], [vec![], num(1)], [num(1), num(-1)]] {
            let outcome = run_inout(&ctx, &witness);
            assert_eq!(
                outcome,
                ExecutionOutcome::ConsensusError(InterpreterErrorCode::IndexOutOfBounds)
            );
            assert_eq!(outcome.to_string(), "Index out of bounds");
        }
    }

    #[test]
    fn test_inout_amount_pushes_both_amounts() {
        let ctx = MockContext::funding(ONE_BTC);
        let change = 2 * ONE_BTC - ONE_BTC - 1000;
        let mut script = asm("OP_INOUT_AMOUNT");
        script.append_push_data(&num(change as i64)).unwrap();
        script.append_opcodes(&[OP_EQUALVERIFY]).unwrap();
        script.append_push_data(&num(2 * ONE_BTC as i64)).unwrap();
        script.append_opcodes(&[OP_EQUAL]).unwrap();
        let outcome = run_with(
            LEAF_VERSION_TAPSCRIPT_64BIT,
            &script,
            &[num(1), num(2)],
            ScriptFlags::STANDARD,
            Some(&ctx),
        );
        assert_eq!(outcome, ExecutionOutcome::Success);
    }

    #[test]
    fn test_inout_amount_missing_context() {
        let outcome = run64(&inout_script(), &[num(1), num(1)]);
        assert_eq!(outcome, script_err(InterpreterErrorCode::InvalidParams));

        let mut ctx = MockContext::funding(ONE_BTC);
        ctx.input_amounts = vec![None];
        assert_eq!(
            run_inout(&ctx, &[num(1), num(1)]),
            script_err(InterpreterErrorCode::InvalidParams)
        );
    }

    #[test]
    fn test_inout_amount_is_op_success_in_base_leaf() {
        let outcome = run_with(LEAF_VERSION_TAPSCRIPT, &inout_script(), &[], ScriptFlags::MANDATORY, None);
        assert_eq!(outcome, ExecutionOutcome::Success);
    }

    // ---- locktime ----

    fn locktime_ctx(lock_time: u32, sequence: u32) -> MockContext {
        MockContext {
            lock_time,
            version: 2,
            sequences: vec![sequence],
            input_amounts: vec![Some(ONE_BTC)],
            output_amounts: vec![ONE_BTC - 1000],
        }
    }

    fn run_cltv(ctx: &MockContext, lock: i64) -> ExecutionOutcome {
        let mut script = Script::new();
        script.append_number(lock).unwrap();
        script.append_opcodes(&[OP_CHECKLOCKTIMEVERIFY]).unwrap();
        run_with(LEAF_VERSION_TAPSCRIPT_64BIT, &script, &[], ScriptFlags::STANDARD, Some(ctx))
    }

    #[test]
    fn test_cltv_satisfied() {
        let ctx = locktime_ctx(100, 0xffff_fffe);
        assert_eq!(run_cltv(&ctx, 100), ExecutionOutcome::Success);
        assert_eq!(run_cltv(&ctx, 99), ExecutionOutcome::Success);
    }

    #[test]
    fn test_cltv_unsatisfied() {
        let ctx = locktime_ctx(100, 0xffff_fffe);
        let outcome = run_cltv(&ctx, 101);
        assert_eq!(outcome, script_err(InterpreterErrorCode::UnsatisfiedLockTime));
        assert_eq!(outcome.to_string(), "Locktime requirement not satisfied");

        // Height against timestamp.
        assert_eq!(
            run_cltv(&locktime_ctx(600_000_000, 0), 100),
            script_err(InterpreterErrorCode::UnsatisfiedLockTime)
        );
        // Finalized input.
        assert_eq!(
            run_cltv(&locktime_ctx(100, 0xffff_ffff), 50),
            script_err(InterpreterErrorCode::UnsatisfiedLockTime)
        );
    }

    #[test]
    fn test_cltv_negative() {
        let ctx = locktime_ctx(100, 0);
        assert_eq!(run_cltv(&ctx, -1), script_err(InterpreterErrorCode::NegativeLockTime));
    }

    #[test]
    fn test_cltv_as_nop_without_flag() {
        let script = asm("OP_16 OP_CHECKLOCKTIMEVERIFY");
        let flags = ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS;
        assert_eq!(
            run_with(LEAF_VERSION_TAPSCRIPT_64BIT, &script, &[], ScriptFlags::NONE, None),
            ExecutionOutcome::Success
        );
        assert_eq!(
            run_with(LEAF_VERSION_TAPSCRIPT_64BIT, &script, &[], flags, None),
            script_err(InterpreterErrorCode::DiscourageUpgradableNops)
        );
    }

    #[test]
    fn test_csv() {
        let script = asm("OP_10 OP_CHECKSEQUENCEVERIFY");
        let run = |ctx: &MockContext| {
            run_with(LEAF_VERSION_TAPSCRIPT_64BIT, &script, &[], ScriptFlags::STANDARD, Some(ctx))
        };
        assert_eq!(run(&locktime_ctx(0, 10)), ExecutionOutcome::Success);
        assert_eq!(run(&locktime_ctx(0, 9)), script_err(InterpreterErrorCode::UnsatisfiedLockTime));
        assert_eq!(
            run(&locktime_ctx(0, 0xffff_ffff)),
            script_err(InterpreterErrorCode::UnsatisfiedLockTime)
        );
        let mut v1 = locktime_ctx(0, 10);
        v1.version = 1;
        assert_eq!(run(&v1), script_err(InterpreterErrorCode::UnsatisfiedLockTime));
    }
}
