//! # End-of-line synchronization

use log::debug;

use crate::{
    bits::BitCursor,
    tables::{EOL, EOL_BITS},
    FaxError, FaxResult,
};

/// Zero bits at the start of an EOL
const EOL_ZEROS: usize = EOL_BITS as usize - 1;

/// What was skipped to get to an EOL
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct EolSeek {
    /// Number of bits in front of the EOL
    pub skipped: usize,
    /// Whether any of the skipped bits was set
    pub stray_bits: bool,
}

/// Move past the next EOL
///
/// If there is none, the cursor does not move.
pub(crate) fn seek_eol(cursor: &mut BitCursor) -> Option<EolSeek> {
    let start = cursor.position();
    if cursor.remaining() < usize::from(EOL_BITS) {
        return None;
    }
    let mut window = cursor.read(EOL_BITS);
    let mut stray_bits = false;
    while window != EOL {
        if cursor.remaining() == 0 {
            cursor.rewind(cursor.position() - start);
            return None;
        }
        stray_bits |= window & 0x800 != 0;
        window = (window << 1 | cursor.read(1)) & 0xfff;
    }
    Some(EolSeek {
        skipped: cursor.position() - start - usize::from(EOL_BITS),
        stray_bits,
    })
}

/// Whether the next set bit ends an EOL, with or without fill bits
pub(crate) fn next_is_eol(cursor: &BitCursor) -> bool {
    let mut probe = cursor.clone();
    let mut zeros = 0;
    while probe.remaining() > 0 {
        if probe.read(1) == 1 {
            return zeros >= EOL_ZEROS;
        }
        zeros += 1;
    }
    false
}

/// Reads the EOL and the mode tag in front of each row of a mixed page
#[derive(Debug)]
pub(crate) struct EolReader {
    /// Whether each EOL is padded to end on a byte boundary
    fill_bits: bool,
}

impl EolReader {
    pub fn new(fill_bits: bool) -> Self {
        Self { fill_bits }
    }

    /// Find the EOL in front of `row` and return the tag bit after it
    ///
    /// A tag of `1` announces a 1D row, `0` a 2D row. Returns `None` when
    /// only zero bits are left. After a truncated row (`resync`), the rest
    /// of that row is skipped without checking it.
    pub fn read_eol(
        &mut self,
        cursor: &mut BitCursor,
        row: usize,
        resync: bool,
    ) -> FaxResult<Option<u32>> {
        let seek = match seek_eol(cursor) {
            Some(seek) => seek,
            None if cursor.is_exhausted() => return Ok(None),
            None => return Err(FaxError::MissingEol { row }),
        };
        let first = row == 0;
        if self.fill_bits {
            if seek.stray_bits && !resync {
                return Err(FaxError::FillBits { row });
            }
            if !cursor.is_aligned() {
                if first {
                    debug!("The first EOL is not padded, ignoring fill bits");
                    self.fill_bits = false;
                } else {
                    return Err(FaxError::UnalignedEol { row });
                }
            }
        } else if first && seek.skipped >= 4 && !seek.stray_bits && cursor.is_aligned() {
            debug!("The first EOL is padded, expecting fill bits");
            self.fill_bits = true;
        }
        Ok(Some(cursor.read(1)))
    }
}
