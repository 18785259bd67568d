/// Failures of dataset construction, row extraction and collation.
///
/// Every variant is a caller contract violation; nothing here is
/// transient, so none of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum SparseDataError {
    /// Two lengths that must agree do not, e.g. X and Y row counts,
    /// or the index and value sequences of one extract.
    #[error("shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    /// Row or minibatch index outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// An index does not fit the `i64` index type of a batch.
    #[error("index {index} does not fit in i64")]
    IndexOverflow { index: usize },

    #[error("batch size must be positive")]
    InvalidBatchSize,

    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    /// Conversion and I/O failures reported by `matrix-util`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SparseDataError>;

impl SparseDataError {
    pub(crate) fn shape_mismatch(what: impl Into<String>, expected: usize, got: usize) -> Self {
        SparseDataError::ShapeMismatch {
            what: what.into(),
            expected,
            got,
        }
    }
}
