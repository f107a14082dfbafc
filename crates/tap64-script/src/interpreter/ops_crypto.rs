//! Hash and signature operations for the script interpreter.
//!
//! Hashing is fully supported. Signature checking is outside this engine:
//! the tapscript signature opcodes fail with `UnsupportedOpcode`, and the
//! legacy multisig opcodes are disabled in tapscript.

use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::thread::Thread;

pub(crate) enum HashType {
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
}

impl HashType {
    fn digest(&self, buf: &[u8]) -> Vec<u8> {
        match self {
            HashType::Ripemd160 => Ripemd160::digest(buf).to_vec(),
            HashType::Sha1 => Sha1::digest(buf).to_vec(),
            HashType::Sha256 => Sha256::digest(buf).to_vec(),
            HashType::Hash160 => Ripemd160::digest(Sha256::digest(buf)).to_vec(),
            HashType::Hash256 => Sha256::digest(Sha256::digest(buf)).to_vec(),
        }
    }
}

impl<'a> Thread<'a> {
    pub(crate) fn op_hash(&mut self, hash_type: HashType) -> Result<(), InterpreterError> {
        let buf = self.dstack.pop_byte_array()?;
        self.dstack.push_byte_array(hash_type.digest(&buf));
        Ok(())
    }

    pub(crate) fn op_signature_unsupported(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        Err(InterpreterError::new(
            InterpreterErrorCode::UnsupportedOpcode,
            format!("{} requires signature validation, which is not available", pop.name()),
        ))
    }

    pub(crate) fn op_checkmultisig(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        Err(InterpreterError::new(
            InterpreterErrorCode::TapscriptCheckMultiSig,
            format!("{} is disabled in tapscript", pop.name()),
        ))
    }
}
