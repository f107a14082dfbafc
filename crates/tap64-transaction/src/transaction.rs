//! Core transaction type.
//!
//! Represents a transaction with version, inputs, outputs, and locktime, and
//! exposes it to the interpreter as a read-only [`TxContext`].

use tap64_script::interpreter::TxContext;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;

/// A transaction consisting of a version, a set of inputs, a set of
/// outputs, and a lock time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version. CHECKSEQUENCEVERIFY requires 2 or more.
    pub version: u32,

    /// Ordered list of transaction inputs.
    pub inputs: Vec<TransactionInput>,

    /// Ordered list of transaction outputs.
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,
}

impl Transaction {
    /// Create a new empty transaction with version 2 and lock time 0.
    ///
    /// # Returns
    /// A `Transaction` with no inputs or outputs.
    pub fn new() -> Self {
        Transaction {
            version: 2,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    /// Append a `TransactionInput` to this transaction.
    ///
    /// # Arguments
    /// * `input` - The input to add.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Return the number of inputs in the transaction.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Append a `TransactionOutput` to this transaction.
    ///
    /// # Arguments
    /// * `output` - The output to add.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Return the number of outputs in the transaction.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl TxContext for Transaction {
    fn lock_time(&self) -> u32 {
        self.lock_time
    }

    fn tx_version(&self) -> u32 {
        self.version
    }

    fn input_sequence(&self, input_idx: usize) -> Option<u32> {
        self.inputs.get(input_idx).map(|i| i.sequence_number)
    }

    fn input_count(&self) -> usize {
        self.inputs.len()
    }

    fn output_count(&self) -> usize {
        self.outputs.len()
    }

    fn input_amount(&self, input_idx: usize) -> Option<u64> {
        self.inputs.get(input_idx).and_then(|i| i.source_tx_satoshis())
    }

    fn output_amount(&self, output_idx: usize) -> Option<u64> {
        self.outputs.get(output_idx).map(|o| o.satoshis)
    }
}
