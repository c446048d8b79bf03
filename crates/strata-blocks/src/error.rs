//! Error types for block lists, indexes, and record export.

use strata_pos::BlockPos;

use crate::compact::RelPos;

/// Errors raised by list accessors, the chunk serializer, and the file sink.
#[derive(Debug, thiserror::Error)]
pub enum BlockListError {
    /// An index-based accessor was called past the end of the sequence.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Sequence length at the time of the call.
        len: usize,
    },

    /// A position does not fit the chunk-relative serialization window.
    #[error("position {pos} outside serialization window (relative {rel})")]
    OutOfWindow {
        /// The world position that was rejected.
        pos: BlockPos,
        /// The same position after offset and chunk relativization.
        rel: RelPos,
    },

    /// Writing records to disk failed.
    #[error("failed to write records: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding records as JSON failed.
    #[error("failed to encode records: {0}")]
    Json(#[from] serde_json::Error),
}
