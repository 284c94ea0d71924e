use thiserror::Error;

use crate::Bitmap;

/// An error when decoding a CCITT encoded bi-level image
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaxError {
    /// The parameters ask for rows without pixels
    #[error("the image width must be at least one pixel")]
    ZeroColumns,
    /// The bitmap would not fit into memory
    #[error("an image of {columns}x{rows} pixels is too large")]
    TooLarge {
        /// Requested width
        columns: usize,
        /// Requested height
        rows: usize,
    },
    /// A fill order other than 1 or 2
    #[error("unsupported fill order {0}")]
    UnsupportedFillOrder(u16),
    /// A mixed 1D/2D page starts with a 2D row
    #[error("the first row must be 1D encoded")]
    FirstRowNot1D,
    /// There is more data, but no EOL in front of the next row
    #[error("no EOL found before row {row}")]
    MissingEol {
        /// Index of the row
        row: usize,
    },
    /// Bits that should pad an EOL to a byte boundary are set
    #[error("non-zero fill bits before the EOL of row {row}")]
    FillBits {
        /// Index of the row
        row: usize,
    },
    /// An EOL does not end on a byte boundary although fill bits are used
    #[error("the EOL of row {row} does not end on a byte boundary")]
    UnalignedEol {
        /// Index of the row
        row: usize,
    },
}

/// Type alias for convenience
pub type FaxResult<T> = Result<T, FaxError>;

/// A decoding attempt that ended early
#[derive(Debug, Error)]
#[error("{error} (after {rows} rows)")]
pub struct DecodeFailure {
    /// What went wrong
    #[source]
    pub error: FaxError,
    /// Number of rows that were decoded
    pub rows: usize,
    /// The rows decoded so far
    pub bitmap: Bitmap,
}
