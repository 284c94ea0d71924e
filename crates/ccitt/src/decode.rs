//! # Decoding parameters and entry points

use std::fmt;

use log::warn;

use crate::{
    bits::{BitCursor, FillOrder},
    g3, g42d,
    session::DecodeSession,
    Bitmap, DecodeFailure, FaxError, FaxResult,
};

/// Widest row the decoder accepts
pub const MAX_COLUMNS: usize = 1 << 20;

/// Largest bitmap the decoder allocates, in bytes
pub const MAX_BITMAP_BYTES: usize = 1 << 30;

/// The coding scheme of a page
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Coding {
    /// T.4 modified Huffman, one row at a time
    Group3OneD,
    /// T.4 modified READ, at most `k - 1` 2D rows after each 1D row
    Group3TwoD {
        /// Maximum distance between two 1D rows
        k: u32,
    },
    /// T.6 modified modified READ, 2D rows only
    Group4,
}

impl Coding {
    /// Select the scheme from the `K` parameter of a PDF `CCITTFaxDecode` filter
    pub fn from_k(k: i32) -> Self {
        match k {
            k if k < 0 => Self::Group4,
            0 => Self::Group3OneD,
            k => Self::Group3TwoD { k: k.unsigned_abs() },
        }
    }
}

impl fmt::Display for Coding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group3OneD => f.write_str("Group 3 1D"),
            Self::Group3TwoD { k } => write!(f, "Group 3 2D (K={})", k),
            Self::Group4 => f.write_str("Group 4"),
        }
    }
}

impl TryFrom<u16> for FillOrder {
    type Error = FaxError;

    fn try_from(value: u16) -> FaxResult<Self> {
        Self::from_tag(value).ok_or(FaxError::UnsupportedFillOrder(value))
    }
}

/// Parameters of a CCITT encoded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeParams {
    /// Pixels per row
    pub columns: usize,
    /// Number of rows, or `0` to decode until the data ends
    pub rows: usize,
    /// Coding scheme, see [`Coding::from_k`]
    pub k: i32,
    /// Whether each row (T.4 1D, T.6) or EOL (T.4 2D) starts on a byte boundary
    pub encoded_byte_align: bool,
    /// Whether the caller wants `1` bits to be black
    pub black_is_1: bool,
    /// The order of bits in a byte
    pub fill_order: FillOrder,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            columns: 1728,
            rows: 0,
            k: 0,
            encoded_byte_align: false,
            black_is_1: false,
            fill_order: FillOrder::MsbToLsb,
        }
    }
}

impl DecodeParams {
    /// The coding scheme selected by `k`
    pub fn coding(&self) -> Coding {
        Coding::from_k(self.k)
    }

    /// Check that a bitmap of this size can be created
    ///
    /// At most [`MAX_COLUMNS`] columns are accepted, and a fixed height
    /// must keep the bitmap within [`MAX_BITMAP_BYTES`].
    pub fn validate(&self) -> FaxResult<()> {
        if self.columns == 0 {
            return Err(FaxError::ZeroColumns);
        }
        let too_large = FaxError::TooLarge {
            columns: self.columns,
            rows: self.rows,
        };
        if self.columns > MAX_COLUMNS {
            return Err(too_large);
        }
        match self.stride().checked_mul(self.rows) {
            Some(len) if len <= MAX_BITMAP_BYTES => Ok(()),
            _ => Err(too_large),
        }
    }

    fn stride(&self) -> usize {
        self.columns.div_ceil(8)
    }

    /// Rows that fit into [`MAX_BITMAP_BYTES`] when the height is open
    fn max_rows(&self) -> usize {
        MAX_BITMAP_BYTES / self.stride().max(1)
    }

    fn fixed_rows(&self) -> Option<usize> {
        (self.rows > 0).then_some(self.rows)
    }
}

/// Decode a page with the given scheme, without any fallback
///
/// The bitmap is not inverted, `1` bits are black.
pub fn try_decode(
    data: &[u8],
    params: &DecodeParams,
    coding: Coding,
) -> Result<Bitmap, DecodeFailure> {
    if let Err(error) = params.validate() {
        return Err(DecodeFailure {
            error,
            rows: 0,
            bitmap: Bitmap::new(0, 0),
        });
    }

    let rows = params.fixed_rows();
    let mut bitmap = Bitmap::new(params.columns, params.rows);
    let cursor = BitCursor::with_fill_order(data, params.fill_order);
    let width = params.columns.max(2);
    let mut session = DecodeSession::new(cursor, width, params.encoded_byte_align);
    session.max_rows = params.max_rows();
    let result = match coding {
        Coding::Group3OneD => g3::decode_1d(&mut session, &mut bitmap, rows),
        Coding::Group3TwoD { .. } => g3::decode_mixed(&mut session, &mut bitmap, rows),
        Coding::Group4 => g42d::decode_t6(&mut session, &mut bitmap, rows),
    };
    if rows.is_none() && session.row == session.max_rows {
        warn!(
            "page ended after {} rows, the size limit for {} columns",
            session.row, params.columns
        );
    }
    session.report();
    bitmap.clear_padding();

    match result {
        Ok(()) => Ok(bitmap),
        Err(error) => Err(DecodeFailure {
            error,
            rows: session.row,
            bitmap,
        }),
    }
}

/// Decode a page, retrying once as Group 4 if the selected scheme fails
///
/// Only invalid parameters are reported as an error. When decoding fails,
/// the rows decoded up to that point are returned. Unless `black_is_1` is
/// set, the bitmap is inverted before it is returned.
pub fn decode(data: &[u8], params: &DecodeParams) -> FaxResult<Bitmap> {
    params.validate()?;
    let coding = params.coding();
    let mut bitmap = match try_decode(data, params, coding) {
        Ok(bitmap) => bitmap,
        Err(first) if coding == Coding::Group4 => {
            warn!("{} decoding failed: {}", coding, first);
            first.bitmap
        }
        Err(first) => {
            warn!("{} decoding failed: {}, retrying as Group 4", coding, first);
            match try_decode(data, params, Coding::Group4) {
                Ok(bitmap) => bitmap,
                Err(second) => {
                    warn!("Group 4 decoding failed: {}", second);
                    if second.rows > first.rows {
                        second.bitmap
                    } else {
                        first.bitmap
                    }
                }
            }
        }
    };
    if !params.black_is_1 {
        bitmap.invert();
    }
    Ok(bitmap)
}
