//! Transaction input referencing a previous output.
//!
//! Contains the source transaction ID, output index, sequence number, the
//! witness stack, and the source output being spent. The source output's value
//! is what OP_INOUT_AMOUNT reports for this input.

use crate::output::TransactionOutput;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single input in a transaction.
///
/// Each input references an output from a previous transaction by its
/// transaction ID (`source_txid`) and output index (`source_tx_out_index`).
/// For a script-path spend the `witness` holds the initial stack, the leaf
/// script and the control block, optionally followed by an annex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// The 32-byte transaction ID of the output being spent, in internal
    /// (little-endian) byte order.
    pub source_txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub source_tx_out_index: u32,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence_number: u32,

    /// Witness stack items, bottom first.
    pub witness: Vec<Vec<u8>>,

    /// The output being spent, when known.
    source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// Create a new `TransactionInput` with default values.
    ///
    /// The source txid is zeroed, output index is 0, sequence is finalized,
    /// and the witness and source output are empty.
    ///
    /// # Returns
    /// A default `TransactionInput`.
    pub fn new() -> Self {
        TransactionInput {
            source_txid: [0u8; 32],
            source_tx_out_index: 0,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            witness: Vec::new(),
            source_output: None,
        }
    }

    /// Create an input spending `vout` of `txid` with a known source output.
    ///
    /// # Arguments
    /// * `txid` - Source transaction ID in internal byte order.
    /// * `vout` - Output index within the source transaction.
    /// * `source_output` - The output being spent.
    pub fn spending(txid: [u8; 32], vout: u32, source_output: TransactionOutput) -> Self {
        TransactionInput {
            source_txid: txid,
            source_tx_out_index: vout,
            source_output: Some(source_output),
            ..Self::new()
        }
    }

    /// Set a direct source output on this input.
    ///
    /// # Arguments
    /// * `output` - The source output, or `None` to clear.
    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    /// Look up the source transaction output, if available.
    pub fn source_tx_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }

    /// Return the satoshi value of the source output, if available.
    pub fn source_tx_satoshis(&self) -> Option<u64> {
        self.source_tx_output().map(|o| o.satoshis)
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self::new()
    }
}
