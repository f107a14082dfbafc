//! Script execution stack.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::scriptnum::ScriptNum;

/// Convert byte array to boolean (consensus rules).
pub fn as_bool(t: &[u8]) -> bool {
    for (i, &b) in t.iter().enumerate() {
        if b != 0 {
            // Negative zero is also false
            return !(i == t.len() - 1 && b == 0x80);
        }
    }
    false
}

/// Convert boolean to byte array.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        vec![]
    }
}

/// The main data/alt stack used by the script interpreter.
///
/// Indexes passed to `peek_*`, `nip_n`, `pick_n` and `roll_n` count from the
/// top (0 is the top element) and are signed so that values decoded from
/// script numbers can be passed through unchanged.
#[derive(Debug, Clone)]
pub struct Stack {
    stk: Vec<Vec<u8>>,
    pub max_num_length: usize,
    pub verify_minimal_data: bool,
    /// Code reported when an arithmetic operand is longer than `max_num_length`.
    pub oversize_code: InterpreterErrorCode,
    empty_code: InterpreterErrorCode,
}

impl Stack {
    pub fn new(max_num_length: usize, verify_minimal_data: bool, oversize_code: InterpreterErrorCode) -> Self {
        Stack {
            stk: Vec::new(),
            max_num_length,
            verify_minimal_data,
            oversize_code,
            empty_code: InterpreterErrorCode::InvalidStackOperation,
        }
    }

    /// A stack whose underflow reports `InvalidAltStackOperation`.
    pub fn alt(max_num_length: usize, verify_minimal_data: bool, oversize_code: InterpreterErrorCode) -> Self {
        Stack {
            empty_code: InterpreterErrorCode::InvalidAltStackOperation,
            ..Stack::new(max_num_length, verify_minimal_data, oversize_code)
        }
    }

    pub fn depth(&self) -> usize {
        self.stk.len()
    }

    fn invalid_index(&self, idx: i64) -> InterpreterError {
        InterpreterError::new(
            self.empty_code,
            format!("index {} is invalid for stack size {}", idx, self.stk.len()),
        )
    }

    fn position(&self, idx: i64) -> Result<usize, InterpreterError> {
        let depth = self.stk.len();
        match usize::try_from(idx) {
            Ok(i) if i < depth => Ok(depth - i - 1),
            _ => Err(self.invalid_index(idx)),
        }
    }

    pub fn push_byte_array(&mut self, data: Vec<u8>) {
        self.stk.push(data);
    }

    pub fn push_int(&mut self, n: ScriptNum) {
        self.push_byte_array(n.to_bytes());
    }

    pub fn push_bool(&mut self, val: bool) {
        self.push_byte_array(from_bool(val));
    }

    pub fn pop_byte_array(&mut self) -> Result<Vec<u8>, InterpreterError> {
        self.nip_n(0)
    }

    /// Pop an arithmetic operand.
    pub fn pop_int(&mut self) -> Result<ScriptNum, InterpreterError> {
        let data = self.pop_byte_array()?;
        ScriptNum::from_bytes(&data, self.max_num_length, self.verify_minimal_data).map_err(|e| {
            if e.code == InterpreterErrorCode::NumberTooBig {
                InterpreterError::new(self.oversize_code, e.description)
            } else {
                e
            }
        })
    }

    /// Pop a number used as a stack index; oversize encodings are `NumberTooBig`.
    pub fn pop_index(&mut self) -> Result<i64, InterpreterError> {
        let data = self.pop_byte_array()?;
        ScriptNum::from_bytes(&data, self.max_num_length, self.verify_minimal_data).map(|n| n.value())
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        let data = self.pop_byte_array()?;
        Ok(as_bool(&data))
    }

    pub fn peek_byte_array(&self, idx: i64) -> Result<&[u8], InterpreterError> {
        let pos = self.position(idx)?;
        Ok(&self.stk[pos])
    }

    pub fn nip_n(&mut self, idx: i64) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position(idx)?;
        Ok(self.stk.remove(pos))
    }

    pub fn tuck(&mut self) -> Result<(), InterpreterError> {
        let so2 = self.pop_byte_array()?;
        let so1 = self.pop_byte_array()?;
        self.push_byte_array(so2.clone());
        self.push_byte_array(so1);
        self.push_byte_array(so2);
        Ok(())
    }

    /// Check that `n` elements are present before a multi-element operation.
    fn require(&self, n: usize) -> Result<(), InterpreterError> {
        if self.stk.len() < n {
            return Err(InterpreterError::new(
                self.empty_code,
                format!("operation needs {} stack items, stack has {}", n, self.stk.len()),
            ));
        }
        Ok(())
    }

    pub fn drop_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(n)?;
        let keep = self.stk.len() - n;
        self.stk.truncate(keep);
        Ok(())
    }

    pub fn dup_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(n)?;
        let start = self.stk.len() - n;
        self.stk.extend_from_within(start..);
        Ok(())
    }

    pub fn rot_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(3 * n)?;
        let start = self.stk.len() - 3 * n;
        self.stk[start..].rotate_left(n);
        Ok(())
    }

    pub fn swap_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(2 * n)?;
        let start = self.stk.len() - 2 * n;
        self.stk[start..].rotate_left(n);
        Ok(())
    }

    pub fn over_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(2 * n)?;
        let start = self.stk.len() - 2 * n;
        self.stk.extend_from_within(start..start + n);
        Ok(())
    }

    pub fn pick_n(&mut self, n: i64) -> Result<(), InterpreterError> {
        let so = self.peek_byte_array(n)?.to_vec();
        self.push_byte_array(so);
        Ok(())
    }

    pub fn roll_n(&mut self, n: i64) -> Result<(), InterpreterError> {
        let so = self.nip_n(n)?;
        self.push_byte_array(so);
        Ok(())
    }

    /// Get stack contents as array (bottom to top).
    pub fn get_stack(&self) -> &[Vec<u8>] {
        &self.stk
    }

    /// Set stack contents from array (last = top).
    pub fn set_stack(&mut self, data: Vec<Vec<u8>>) {
        self.stk = data;
    }
}
