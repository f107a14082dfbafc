//! Transaction output with satoshi value and locking script.

use tap64_script::Script;

/// A single output in a transaction.
///
/// Each output specifies a satoshi value and the `locking_script`
/// (scriptPubKey) that defines the conditions under which the funds may be
/// spent. For taproot outputs this is the witness program; the engine never
/// evaluates it directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// The number of satoshis locked by this output.
    pub satoshis: u64,

    /// The locking script (scriptPubKey).
    pub locking_script: Script,
}

impl TransactionOutput {
    /// Create a new `TransactionOutput` with zero satoshis and an empty script.
    ///
    /// # Returns
    /// A default `TransactionOutput`.
    pub fn new() -> Self {
        TransactionOutput {
            satoshis: 0,
            locking_script: Script::new(),
        }
    }

    /// Create an output paying `satoshis` to `locking_script`.
    ///
    /// # Arguments
    /// * `satoshis` - The output value.
    /// * `locking_script` - The spending condition.
    pub fn with_value(satoshis: u64, locking_script: Script) -> Self {
        TransactionOutput {
            satoshis,
            locking_script,
        }
    }
}

impl Default for TransactionOutput {
    fn default() -> Self {
        Self::new()
    }
}
