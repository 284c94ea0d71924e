//! # Decoder state for one page

use log::{debug, warn};

use crate::{
    bitmap::Bitmap,
    bits::BitCursor,
    decode::MAX_COLUMNS,
    scanline::{RowCoder, RowError},
};

/// Ordinary changes that a line can hold beyond its width
const SLACK: usize = 1;

/// Columns where the color changes within one row
///
/// Starting from white at column 0, even entries are changes to black and
/// odd entries are changes to white. The entries never decrease, and the
/// last one of a finished row equals the width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChangingLine {
    elems: Vec<usize>,
    limit: usize,
}

impl ChangingLine {
    pub(crate) fn new(width: usize) -> Self {
        let limit = width.saturating_add(SLACK);
        Self {
            elems: Vec::with_capacity(limit.min(MAX_COLUMNS + SLACK) + 3),
            limit,
        }
    }

    /// The recorded changes
    pub fn as_slice(&self) -> &[usize] {
        &self.elems
    }

    pub(crate) fn clear(&mut self) {
        self.elems.clear();
    }

    /// Record a change, dropping it if the line is full
    pub(crate) fn push(&mut self, pos: usize) {
        if self.elems.len() < self.limit {
            self.elems.push(pos);
        }
    }

    /// Record one of the entries that close a row
    pub(crate) fn push_end(&mut self, pos: usize) {
        self.elems.push(pos);
    }
}

/// The reference and coding line, swapped between rows
#[derive(Debug, Clone)]
pub(crate) struct ChangingElements {
    lines: [ChangingLine; 2],
    coding: usize,
}

impl ChangingElements {
    /// Create the buffers; the first reference line is all white
    pub(crate) fn new(width: usize) -> Self {
        let mut white = ChangingLine::new(width);
        white.push_end(width);
        white.push_end(width);
        Self {
            lines: [white, ChangingLine::new(width)],
            coding: 0,
        }
    }

    /// Make the last coding line the reference line and clear the other
    pub(crate) fn advance(&mut self) {
        self.coding ^= 1;
        self.lines[self.coding].clear();
    }

    pub(crate) fn split(&mut self) -> (&ChangingLine, &mut ChangingLine) {
        let [first, second] = &mut self.lines;
        if self.coding == 0 {
            (&*second, first)
        } else {
            (&*first, second)
        }
    }
}

/// Everything that one decode call mutates, apart from the output
#[derive(Debug)]
pub(crate) struct DecodeSession<'a> {
    pub cursor: BitCursor<'a>,
    pub lines: ChangingElements,
    /// Decoding width, at least 2
    pub width: usize,
    /// Index of the current row
    pub row: usize,
    /// Rows that ended before the full width
    pub truncated: usize,
    pub byte_align: bool,
    /// Most rows a page without a fixed height may grow to
    pub max_rows: usize,
}

/// How a row is coded
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum RowMode {
    /// Alternating white and black runs
    OneD,
    /// Relative to the row above
    TwoD,
}

impl<'a> DecodeSession<'a> {
    pub fn new(cursor: BitCursor<'a>, width: usize, byte_align: bool) -> Self {
        Self {
            cursor,
            lines: ChangingElements::new(width),
            width,
            row: 0,
            truncated: 0,
            byte_align,
            max_rows: usize::MAX,
        }
    }

    /// Whether the page has room for another row, or, without a fixed
    /// height, whether there is input left and the page is below `max_rows`
    pub fn wants_row(&self, rows: Option<usize>) -> bool {
        match rows {
            Some(rows) => self.row < rows,
            None => self.row < self.max_rows && !self.cursor.is_exhausted(),
        }
    }

    /// Decode the next row into `bitmap`, adding it if necessary
    pub fn decode_row(&mut self, bitmap: &mut Bitmap, mode: RowMode) -> Result<(), RowError> {
        bitmap.grow(self.row + 1);
        self.lines.advance();
        let (reference, line) = self.lines.split();
        let row = bitmap.row_mut(self.row);
        let mut coder = RowCoder::new(self.width);
        let result = match mode {
            RowMode::OneD => coder.decode_1d(&mut self.cursor, line, row),
            RowMode::TwoD => coder.decode_2d(&mut self.cursor, reference.as_slice(), line, row),
        };
        coder.finish(line);
        debug_assert!(
            line.as_slice().windows(2).all(|pair| pair[0] <= pair[1])
                && line.as_slice().last() == Some(&self.width),
            "changing elements of row {}: {:?}",
            self.row,
            line.as_slice()
        );
        if let Err(err) = &result {
            debug!("row {} ({:?}) truncated: {}", self.row, mode, err);
            self.truncated += 1;
        }
        self.row += 1;
        result
    }

    /// Check whether the last row consumed any input since `start`
    ///
    /// If it did not, the page ends here, and the empty row is dropped
    /// again when the page has no fixed height.
    pub fn stalled(&mut self, bitmap: &mut Bitmap, start: usize, rows: Option<usize>) -> bool {
        if self.cursor.position() != start {
            return false;
        }
        debug!("no progress at bit {}, ending page after row {}", start, self.row);
        if rows.is_none() && self.row > 0 {
            self.row -= 1;
            self.truncated = self.truncated.saturating_sub(1);
            bitmap.truncate(self.row);
        }
        true
    }

    /// Log a summary of the page
    pub fn report(&self) {
        if self.truncated > 0 {
            warn!(
                "{} of {} rows ended early and were padded with white",
                self.truncated, self.row
            );
        }
    }
}
