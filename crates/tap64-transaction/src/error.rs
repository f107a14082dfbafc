/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The witness of an input does not have the shape of a script-path spend.
    #[error("invalid witness: {0}")]
    InvalidWitness(String),
    /// The requested input index is not part of the transaction.
    #[error("input index {index} out of range for {count} inputs")]
    InputIndexOutOfRange { index: usize, count: usize },
    /// The input's script rejected the spend.
    #[error(transparent)]
    Rejected(#[from] crate::validation::RejectReason),
}
