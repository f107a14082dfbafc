//! Arithmetic and comparison operations for the script interpreter.
//!
//! Operands are popped with the leaf's operand length limit. Results are
//! exact; any result outside the script number range fails the script.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::scriptnum::ScriptNum;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_unary_int(
        &mut self,
        f: impl FnOnce(ScriptNum) -> Result<ScriptNum, InterpreterError>,
    ) -> Result<(), InterpreterError> {
        let m = self.dstack.pop_int()?;
        self.dstack.push_int(f(m)?);
        Ok(())
    }

    pub(crate) fn op_not(&mut self) -> Result<(), InterpreterError> {
        let m = self.dstack.pop_int()?;
        self.dstack.push_bool(m.is_zero());
        Ok(())
    }

    pub(crate) fn op_0notequal(&mut self) -> Result<(), InterpreterError> {
        let m = self.dstack.pop_int()?;
        self.dstack.push_bool(!m.is_zero());
        Ok(())
    }

    pub(crate) fn op_add(&mut self) -> Result<(), InterpreterError> {
        let v0 = self.dstack.pop_int()?;
        let v1 = self.dstack.pop_int()?;
        self.dstack.push_int(v1.checked_add(v0)?);
        Ok(())
    }

    pub(crate) fn op_sub(&mut self) -> Result<(), InterpreterError> {
        let v0 = self.dstack.pop_int()?;
        let v1 = self.dstack.pop_int()?;
        self.dstack.push_int(v1.checked_sub(v0)?);
        Ok(())
    }

    pub(crate) fn op_mul(&mut self) -> Result<(), InterpreterError> {
        let v0 = self.dstack.pop_int()?;
        let v1 = self.dstack.pop_int()?;
        self.dstack.push_int(v1.checked_mul(v0)?);
        Ok(())
    }

    /// `a b OP_DIV` leaves the Euclidean quotient and then the remainder on top.
    pub(crate) fn op_div(&mut self) -> Result<(), InterpreterError> {
        let b = self.dstack.pop_int()?;
        let a = self.dstack.pop_int()?;
        let (q, r) = a.div_euclid(b)?;
        self.dstack.push_int(q);
        self.dstack.push_int(r);
        Ok(())
    }

    pub(crate) fn op_bool_binop(
        &mut self,
        f: impl FnOnce(&ScriptNum, &ScriptNum) -> bool,
    ) -> Result<(), InterpreterError> {
        let v0 = self.dstack.pop_int()?;
        let v1 = self.dstack.pop_int()?;
        self.dstack.push_bool(f(&v1, &v0));
        Ok(())
    }

    pub(crate) fn op_numequalverify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.op_bool_binop(|a, b| a == b)?;
        self.abstract_verify(pop, InterpreterErrorCode::NumEqualVerify)
    }

    pub(crate) fn op_min(&mut self) -> Result<(), InterpreterError> {
        let v0 = self.dstack.pop_int()?;
        let v1 = self.dstack.pop_int()?;
        self.dstack.push_int(v1.min(v0));
        Ok(())
    }

    pub(crate) fn op_max(&mut self) -> Result<(), InterpreterError> {
        let v0 = self.dstack.pop_int()?;
        let v1 = self.dstack.pop_int()?;
        self.dstack.push_int(v1.max(v0));
        Ok(())
    }

    /// `x min max OP_WITHIN` is true when `min <= x < max`.
    pub(crate) fn op_within(&mut self) -> Result<(), InterpreterError> {
        let max_val = self.dstack.pop_int()?;
        let min_val = self.dstack.pop_int()?;
        let x = self.dstack.pop_int()?;
        self.dstack.push_bool(min_val <= x && x < max_val);
        Ok(())
    }
}
