//! Terminal and intermediate states of an evaluation.

use std::fmt;

use super::error::{InterpreterError, InterpreterErrorCode, Severity};

/// State reported by the dispatcher after each step and at termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionOutcome {
    /// More opcodes remain.
    Continue,
    /// The script accepted the spend.
    Success,
    /// Execution finished without error but the stack is empty or its top is false.
    ScriptFalse,
    /// An opcode failed with an ordinary script error.
    ScriptError(InterpreterErrorCode),
    /// An opcode violated a consensus bound (overflow, index out of bounds).
    ConsensusError(InterpreterErrorCode),
}

impl ExecutionOutcome {
    /// Classify an interpreter error by the severity of its code.
    pub fn from_error(err: &InterpreterError) -> Self {
        if err.code == InterpreterErrorCode::EvalFalse {
            return ExecutionOutcome::ScriptFalse;
        }
        match err.severity() {
            Severity::Script => ExecutionOutcome::ScriptError(err.code),
            Severity::Consensus => ExecutionOutcome::ConsensusError(err.code),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionOutcome::Continue)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success)
    }

    /// The error code behind a rejecting outcome.
    pub fn error_code(&self) -> Option<InterpreterErrorCode> {
        match self {
            ExecutionOutcome::ScriptFalse => Some(InterpreterErrorCode::EvalFalse),
            ExecutionOutcome::ScriptError(code) | ExecutionOutcome::ConsensusError(code) => Some(*code),
            ExecutionOutcome::Continue | ExecutionOutcome::Success => None,
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Continue => write!(f, "continue"),
            ExecutionOutcome::Success => write!(f, "success"),
            ExecutionOutcome::ScriptFalse => write!(f, "{}", InterpreterErrorCode::EvalFalse.message()),
            ExecutionOutcome::ScriptError(code) | ExecutionOutcome::ConsensusError(code) => {
                write!(f, "{}", code.message())
            }
        }
    }
}
