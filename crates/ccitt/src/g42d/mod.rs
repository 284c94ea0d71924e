//! # CCITT Group 4 2D-encoding
//!
//! Spec: ITU-T Recommendation T.6 (11/88) <https://www.itu.int/rec/T-REC-T.6-198811-I/en>

use log::debug;

use crate::{
    bitmap::Bitmap,
    bits::BitCursor,
    session::{DecodeSession, RowMode},
    tables::{EOL, EOL_BITS},
    FaxResult,
};

/// Whether the cursor is at an end of facsimile block, two EOLs
fn is_eofb(cursor: &BitCursor) -> bool {
    let mut probe = cursor.clone();
    probe.read(EOL_BITS) == EOL && probe.read(EOL_BITS) == EOL
}

/// Decode a page where every row is coded relative to the one above
pub(crate) fn decode_t6(
    session: &mut DecodeSession,
    bitmap: &mut Bitmap,
    rows: Option<usize>,
) -> FaxResult<()> {
    while session.wants_row(rows) {
        if is_eofb(&session.cursor) {
            session.cursor.skip(2 * usize::from(EOL_BITS));
            debug!("EOFB after row {}", session.row);
            break;
        }
        let start = session.cursor.position();
        match session.decode_row(bitmap, RowMode::TwoD) {
            Ok(()) => {}
            // logged and counted by the session, the page goes on
            Err(_) => {}
        }
        if session.byte_align {
            session.cursor.align();
        }
        if session.stalled(bitmap, start, rows) {
            break;
        }
    }
    Ok(())
}
