//! Byte-string operations for the script interpreter.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::scriptnum::ScriptNum;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_size(&mut self) -> Result<(), InterpreterError> {
        let len = self.dstack.peek_byte_array(0)?.len();
        self.dstack.push_int(ScriptNum::from_amount(len as u64)?);
        Ok(())
    }

    pub(crate) fn op_equal(&mut self) -> Result<(), InterpreterError> {
        let a = self.dstack.pop_byte_array()?;
        let b = self.dstack.pop_byte_array()?;
        self.dstack.push_bool(a == b);
        Ok(())
    }

    pub(crate) fn op_equalverify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.op_equal()?;
        self.abstract_verify(pop, InterpreterErrorCode::EqualVerify)
    }

    pub(crate) fn op_scriptnum_to_le64(&mut self) -> Result<(), InterpreterError> {
        let n = self.dstack.pop_int()?;
        self.dstack.push_byte_array(n.to_le64().to_vec());
        Ok(())
    }

    pub(crate) fn op_le64_to_scriptnum(&mut self) -> Result<(), InterpreterError> {
        let data = self.dstack.pop_byte_array()?;
        self.dstack.push_int(ScriptNum::from_le64(&data)?);
        Ok(())
    }

    pub(crate) fn op_le32_to_le64(&mut self) -> Result<(), InterpreterError> {
        let data = self.dstack.pop_byte_array()?;
        let n = ScriptNum::from_le32(&data)?;
        self.dstack.push_byte_array(n.to_le64().to_vec());
        Ok(())
    }
}
