use seedapi_types::Cardinality;

/// Errors from resource store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The operation belongs to the other cardinality.
    #[error("operation requires a {expected} store, but this store is {actual}")]
    CardinalityMismatch {
        expected: Cardinality,
        actual: Cardinality,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
