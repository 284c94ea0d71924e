//! # CCITT Group 3 page decoding
//!
//! Both the 1D (modified Huffman) and the mixed 1D/2D (modified READ)
//! variant, where every row starts with an EOL and a tag bit.
//!
//! Spec: ITU-T Recommendation T.4 (07/03) <https://www.itu.int/rec/T-REC-T.4-200307-I/en>
use log::debug;

use crate::{
    bitmap::Bitmap,
    scanline::RowError,
    session::{DecodeSession, RowMode},
    tables::EOL_BITS,
    FaxError, FaxResult,
};

mod eol;

use eol::{next_is_eol, seek_eol, EolReader};

/// Decode a page of 1D rows, with or without EOLs in front of them
pub(crate) fn decode_1d(
    session: &mut DecodeSession,
    bitmap: &mut Bitmap,
    rows: Option<usize>,
) -> FaxResult<()> {
    let mut uses_eol = false;
    while session.wants_row(rows) {
        let start = session.cursor.position();
        if next_is_eol(&session.cursor) && seek_eol(&mut session.cursor).is_some() {
            uses_eol = true;
            if next_is_eol(&session.cursor) {
                debug!("RTC after row {}", session.row);
                break;
            }
            if !session.wants_row(rows) {
                break;
            }
        }

        match session.decode_row(bitmap, RowMode::OneD) {
            Ok(()) | Err(RowError::UnexpectedEol(_)) => {}
            Err(_) if uses_eol => {
                if seek_eol(&mut session.cursor).is_some() {
                    session.cursor.rewind(usize::from(EOL_BITS));
                }
            }
            Err(_) => {}
        }
        if session.byte_align && !uses_eol {
            session.cursor.align();
        }
        if session.stalled(bitmap, start, rows) {
            break;
        }
    }
    Ok(())
}

/// Decode a page where the tag bit after each EOL picks 1D or 2D coding
pub(crate) fn decode_mixed(
    session: &mut DecodeSession,
    bitmap: &mut Bitmap,
    rows: Option<usize>,
) -> FaxResult<()> {
    let mut eols = EolReader::new(session.byte_align);
    let mut resync = false;
    while session.wants_row(rows) {
        let start = session.cursor.position();
        let Some(tag) = eols.read_eol(&mut session.cursor, session.row, resync)? else {
            break;
        };
        if tag == 1 && next_is_eol(&session.cursor) {
            debug!("RTC after row {}", session.row);
            break;
        }
        let mode = if tag == 1 { RowMode::OneD } else { RowMode::TwoD };
        if session.row == 0 && mode == RowMode::TwoD {
            return Err(FaxError::FirstRowNot1D);
        }
        resync = session.decode_row(bitmap, mode).is_err();
        if session.stalled(bitmap, start, rows) {
            break;
        }
    }
    Ok(())
}
