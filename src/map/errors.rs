//! Error types for the ordered map.
//!
//! All variants are ordinary failure values returned to the immediate
//! caller; no operation retries and no failure leaves a partial mutation
//! visible. Absence on lookups and traversal is `Option`/`None`, never an
//! error.

use thiserror::Error;

use crate::index::IndexKey;

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;

/// Failures of ordered-map operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Construction received the reserved default id or the same index id
    /// twice.
    #[error("duplicate index key: {0}")]
    DuplicateIndexKey(IndexKey),

    /// An operation selected an index id that is unknown or not valid for
    /// it.
    #[error("incorrect index key: {0}")]
    IncorrectIndexKey(IndexKey),

    /// An insert targeted a key that is already present.
    #[error("key already exists")]
    KeyAlreadyExists,

    /// A move or relative insert received a stale or deleted entry handle.
    #[error("record not found")]
    RecordNotFound,

    /// Internal guard: a relative insert direction without its mark.
    #[error("incorrect insert direction")]
    IncorrectDirection,
}
