//! Stack manipulation operations for the script interpreter.

use super::error::InterpreterError;
use super::scriptnum::ScriptNum;
use super::stack::as_bool;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_to_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let data = self.dstack.pop_byte_array()?;
        self.astack.push_byte_array(data);
        Ok(())
    }

    pub(crate) fn op_from_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let data = self.astack.pop_byte_array()?;
        self.dstack.push_byte_array(data);
        Ok(())
    }

    pub(crate) fn op_ifdup(&mut self) -> Result<(), InterpreterError> {
        let so = self.dstack.peek_byte_array(0)?;
        if as_bool(so) {
            let copy = so.to_vec();
            self.dstack.push_byte_array(copy);
        }
        Ok(())
    }

    pub(crate) fn op_depth(&mut self) -> Result<(), InterpreterError> {
        let depth = ScriptNum::from_amount(self.dstack.depth() as u64)?;
        self.dstack.push_int(depth);
        Ok(())
    }

    pub(crate) fn op_pick(&mut self) -> Result<(), InterpreterError> {
        let n = self.dstack.pop_index()?;
        self.dstack.pick_n(n)
    }

    pub(crate) fn op_roll(&mut self) -> Result<(), InterpreterError> {
        let n = self.dstack.pop_index()?;
        self.dstack.roll_n(n)
    }
}
