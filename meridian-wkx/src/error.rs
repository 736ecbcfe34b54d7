//! Error type used by the crate.

use thiserror::Error;

/// Errors reported by the well-known format readers.
///
/// All of them are recoverable at the caller's discretion; a failed read
/// leaves no partially built geometry behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeridianWkxError {
    /// The input ends before the structure it declares is complete.
    #[error("not enough data")]
    NotEnoughData,

    /// The input is structurally invalid.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// The type code or keyword is not in the recognized set.
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometryType(String),
}
