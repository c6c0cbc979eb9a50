//! Error types for the packing engine.

use thiserror::Error;

/// Failures surfaced by layout and frame construction.
///
/// The engine never recovers locally: any of these aborts the current call and
/// no partial tree is handed back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// A caller-supplied argument cannot be honoured (unknown combine mode,
    /// zero target width).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The layout was asked to pack an empty frame list.
    #[error("no frames supplied to layout")]
    MissingInput,

    /// A combined side would not fit in a `u32` pixel count.
    #[error("combined size {0} exceeds the largest supported canvas side")]
    Overflow(u64),
}

/// Result type for packing operations
pub type Result<T> = std::result::Result<T, PackError>;
