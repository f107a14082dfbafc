//! 64-bit script numbers.
//!
//! Stack numbers are little-endian sign-magnitude byte strings with the sign
//! in the most significant bit of the last byte. A [`ScriptNum`] holds a
//! value in the symmetric range [-(2^63-1), 2^63-1]; `i64::MIN` has no
//! sign-magnitude image in 8 bytes and is treated as overflow everywhere.
//!
//! Arithmetic is exact: results leaving the range are reported as
//! `ArithmeticOverflow` instead of wrapping or being pushed unchecked.

use std::fmt;

use super::error::{InterpreterError, InterpreterErrorCode};

/// A bounded signed script number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScriptNum(i64);

fn overflow(what: &str) -> InterpreterError {
    InterpreterError::new(
        InterpreterErrorCode::ArithmeticOverflow,
        format!("{} is outside the 64-bit script number range", what),
    )
}

impl ScriptNum {
    pub const ZERO: ScriptNum = ScriptNum(0);
    pub const ONE: ScriptNum = ScriptNum(1);
    pub const MAX: ScriptNum = ScriptNum(i64::MAX);
    pub const MIN: ScriptNum = ScriptNum(-i64::MAX);

    /// Wrap an `i64`, rejecting `i64::MIN`.
    pub fn new(val: i64) -> Result<Self, InterpreterError> {
        if val == i64::MIN {
            return Err(overflow(&val.to_string()));
        }
        Ok(ScriptNum(val))
    }

    /// Convert an unsigned amount, failing if it does not fit the range.
    pub fn from_amount(amount: u64) -> Result<Self, InterpreterError> {
        i64::try_from(amount)
            .map(ScriptNum)
            .map_err(|_| overflow(&format!("amount {}", amount)))
    }

    /// Decode a stack element.
    ///
    /// `max_len` is the longest accepted encoding (never more than 8).
    /// `require_minimal` rejects encodings with redundant trailing bytes.
    pub fn from_bytes(bb: &[u8], max_len: usize, require_minimal: bool) -> Result<Self, InterpreterError> {
        if bb.len() > max_len || bb.len() > 8 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NumberTooBig,
                format!(
                    "numeric value encoded as {} is {} bytes which exceeds the max allowed of {}",
                    hex::encode(bb),
                    bb.len(),
                    max_len.min(8)
                ),
            ));
        }

        if require_minimal {
            check_minimal_data_encoding(bb)?;
        }

        let Some((&last, _)) = bb.split_last() else {
            return Ok(ScriptNum::ZERO);
        };

        let mut magnitude: u64 = 0;
        for (i, &b) in bb.iter().enumerate() {
            magnitude |= u64::from(b) << (8 * i);
        }
        if last & 0x80 == 0 {
            return Ok(ScriptNum(magnitude as i64));
        }
        magnitude &= !(0x80u64 << (8 * (bb.len() - 1)));
        // At most 63 magnitude bits remain, so the cast and negation are exact.
        Ok(ScriptNum(-(magnitude as i64)))
    }

    /// Minimal sign-magnitude encoding. Zero encodes as the empty string.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.0 == 0 {
            return vec![];
        }
        let negative = self.0 < 0;
        let mut abs = self.0.unsigned_abs();
        let mut result = Vec::with_capacity(9);
        while abs > 0 {
            result.push((abs & 0xff) as u8);
            abs >>= 8;
        }
        let last = result.len() - 1;
        if result[last] & 0x80 != 0 {
            result.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            result[last] |= 0x80;
        }
        result
    }

    /// Decode exactly 8 bytes of two's-complement little-endian.
    pub fn from_le64(bb: &[u8]) -> Result<Self, InterpreterError> {
        let arr: [u8; 8] = bb.try_into().map_err(|_| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidOperandLength,
                format!("expected 8 bytes for a LE64 value, got {}", bb.len()),
            )
        })?;
        ScriptNum::new(i64::from_le_bytes(arr))
    }

    /// Decode exactly 4 bytes of two's-complement little-endian.
    pub fn from_le32(bb: &[u8]) -> Result<Self, InterpreterError> {
        let arr: [u8; 4] = bb.try_into().map_err(|_| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidOperandLength,
                format!("expected 4 bytes for a LE32 value, got {}", bb.len()),
            )
        })?;
        Ok(ScriptNum(i64::from(i32::from_le_bytes(arr))))
    }

    pub fn to_le64(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: ScriptNum) -> Result<Self, InterpreterError> {
        self.0
            .checked_add(other.0)
            .ok_or_else(|| overflow(&format!("{} + {}", self.0, other.0)))
            .and_then(ScriptNum::new)
    }

    pub fn checked_sub(self, other: ScriptNum) -> Result<Self, InterpreterError> {
        self.0
            .checked_sub(other.0)
            .ok_or_else(|| overflow(&format!("{} - {}", self.0, other.0)))
            .and_then(ScriptNum::new)
    }

    pub fn checked_mul(self, other: ScriptNum) -> Result<Self, InterpreterError> {
        self.0
            .checked_mul(other.0)
            .ok_or_else(|| overflow(&format!("{} * {}", self.0, other.0)))
            .and_then(ScriptNum::new)
    }

    /// Euclidean division: returns `(q, r)` with `0 <= r < |divisor|` and
    /// `q * divisor + r == self`.
    pub fn div_euclid(self, divisor: ScriptNum) -> Result<(Self, Self), InterpreterError> {
        if divisor.is_zero() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::DivideByZero,
                "divide by zero".to_string(),
            ));
        }
        let q = self
            .0
            .checked_div_euclid(divisor.0)
            .ok_or_else(|| overflow(&format!("{} / {}", self.0, divisor.0)))?;
        let r = self
            .0
            .checked_rem_euclid(divisor.0)
            .ok_or_else(|| overflow(&format!("{} % {}", self.0, divisor.0)))?;
        Ok((ScriptNum::new(q)?, ScriptNum::new(r)?))
    }

    /// Negation never leaves the symmetric range.
    pub fn negate(self) -> Self {
        ScriptNum(-self.0)
    }

    pub fn abs(self) -> Self {
        ScriptNum(self.0.abs())
    }
}

impl fmt::Display for ScriptNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that a byte array uses minimal data encoding.
pub fn check_minimal_data_encoding(v: &[u8]) -> Result<(), InterpreterError> {
    let Some((&last, rest)) = v.split_last() else {
        return Ok(());
    };

    // A last byte of 0x00/0x80 is only needed when the byte before it has
    // its high bit set.
    if last & 0x7f == 0 && rest.last().map_or(true, |&b| b & 0x80 == 0) {
        return Err(InterpreterError::new(
            InterpreterErrorCode::MinimalData,
            format!("numeric value encoded as {} is not minimally encoded", hex::encode(v)),
        ));
    }

    Ok(())
}
