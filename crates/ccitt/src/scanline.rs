//! # Scanline decoding
//!
//! One row at a time, either as a sequence of alternating white and black
//! runs (1D, modified Huffman) or relative to the row above (2D, modified
//! READ). Black runs are painted into the packed output row, and every
//! change of color is recorded on the coding line for the next row.

use displaydoc::Display;
use log::trace;
use thiserror::Error;

use crate::{
    bitmap::fill_black,
    bits::BitCursor,
    session::ChangingLine,
    tables::{self, Mode, RunCode, RunEntry},
    Color,
};

/// Why a row ended before reaching its width
#[derive(Debug, Display, Error, Copy, Clone, PartialEq, Eq)]
pub(crate) enum RowError {
    /// invalid code at bit {0}
    InvalidCode(usize),
    /// EOL at bit {0} within the row
    UnexpectedEol(usize),
    /// run at bit {0} extends past the end of the row
    Overrun(usize),
}

fn lookup(cursor: &mut BitCursor, table: &[RunEntry], bits: u8) -> RunEntry {
    let entry = table[cursor.read(bits) as usize];
    cursor.rewind(usize::from(bits - entry.bits));
    entry
}

fn black_entry(cursor: &mut BitCursor) -> RunEntry {
    let entry = lookup(cursor, &tables::BLACK_SHORT, tables::BLACK_SHORT_BITS);
    match entry.code {
        RunCode::LongBlack => lookup(cursor, &tables::BLACK_LONG, tables::BLACK_LONG_BITS),
        RunCode::ShortBlack => lookup(cursor, &tables::BLACK_TAIL, tables::BLACK_TAIL_BITS),
        _ => entry,
    }
}

/// Read the makeup and terminating codes of one run
///
/// On an EOL or invalid code, the cursor is left at the start of it.
pub(crate) fn read_run(cursor: &mut BitCursor, color: Color) -> Result<usize, RowError> {
    let mut total = 0;
    loop {
        let at = cursor.position();
        let entry = match color {
            Color::White => lookup(cursor, &tables::WHITE, tables::WHITE_BITS),
            Color::Black => black_entry(cursor),
        };
        match entry.code {
            RunCode::Terminating(len) => return Ok(total + usize::from(len)),
            RunCode::Makeup(len) => total += usize::from(len),
            RunCode::ExtendedMakeup => {
                match lookup(cursor, &tables::EXTENDED, tables::EXTENDED_BITS).code {
                    RunCode::Makeup(len) => total += usize::from(len),
                    _ => {
                        cursor.rewind(cursor.position() - at);
                        return Err(RowError::InvalidCode(at));
                    }
                }
            }
            RunCode::Eol => {
                cursor.rewind(cursor.position() - at);
                return Err(RowError::UnexpectedEol(at));
            }
            RunCode::Invalid | RunCode::LongBlack | RunCode::ShortBlack => {
                cursor.rewind(cursor.position() - at);
                return Err(RowError::InvalidCode(at));
            }
        }
    }
}

/// Position and color within the row that is being decoded
#[derive(Debug)]
pub(crate) struct RowCoder {
    width: usize,
    /// The last decided column, `None` before the start of the row
    a0: Option<usize>,
    color: Color,
    /// Where the last `b1` was found on the reference line
    hint: usize,
}

impl RowCoder {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            a0: None,
            color: Color::White,
            hint: 0,
        }
    }

    /// First pixel that has not been decoded
    fn pos(&self) -> usize {
        self.a0.unwrap_or(0)
    }

    pub fn is_done(&self) -> bool {
        self.pos() >= self.width
    }

    /// Paint `len` pixels in the current color; false if that overruns
    fn paint(&mut self, row: &mut [u8], len: usize) -> bool {
        let pos = self.pos();
        let end = pos.saturating_add(len);
        if self.color == Color::Black {
            fill_black(row, pos, len.min(self.width - pos));
        }
        self.a0 = Some(end.min(self.width));
        end <= self.width
    }

    /// Paint up to `end`, then switch to the other color
    fn change_at(&mut self, line: &mut ChangingLine, row: &mut [u8], end: usize) {
        let len = end.saturating_sub(self.pos());
        self.paint(row, len);
        line.push(self.pos());
        self.color.invert();
    }

    /// Decode one run in the current color
    fn run(
        &mut self,
        cursor: &mut BitCursor,
        line: &mut ChangingLine,
        row: &mut [u8],
    ) -> Result<(), RowError> {
        let at = cursor.position();
        let len = read_run(cursor, self.color)?;
        let fits = self.paint(row, len);
        line.push(self.pos());
        self.color.invert();
        if fits {
            Ok(())
        } else {
            Err(RowError::Overrun(at))
        }
    }

    /// Close the coding line so that it matches what was painted
    pub fn finish(&self, line: &mut ChangingLine) {
        let pos = self.pos();
        if pos < self.width {
            if self.color == Color::Black {
                line.push_end(pos);
            }
            line.push_end(self.width);
        }
        line.push_end(self.width);
    }

    /// Decode a row of alternating white and black runs
    pub fn decode_1d(
        &mut self,
        cursor: &mut BitCursor,
        line: &mut ChangingLine,
        row: &mut [u8],
    ) -> Result<(), RowError> {
        while !self.is_done() {
            self.run(cursor, line, row)?;
        }
        Ok(())
    }

    /// Decode a row relative to the `reference` line
    pub fn decode_2d(
        &mut self,
        cursor: &mut BitCursor,
        reference: &[usize],
        line: &mut ChangingLine,
        row: &mut [u8],
    ) -> Result<(), RowError> {
        while !self.is_done() {
            self.step(cursor, reference, line, row)?;
        }
        Ok(())
    }

    /// Find `b1`, the first change on the reference line after `a0` to the
    /// opposite of the current color, and `b2`, the change after that
    fn changing_elements(&mut self, reference: &[usize]) -> (usize, usize) {
        let parity = match self.color {
            Color::White => 0,
            Color::Black => 1,
        };
        let mut i = self.hint.saturating_sub(1) & !1 | parity;
        while let Some(&b1) = reference.get(i) {
            if self.a0.map_or(true, |a0| b1 > a0) {
                self.hint = i;
                let b2 = reference.get(i + 1).copied().unwrap_or(self.width);
                return (b1, b2);
            }
            i += 2;
        }
        (self.width, self.width)
    }

    /// Decode one mode code and what follows it
    pub fn step(
        &mut self,
        cursor: &mut BitCursor,
        reference: &[usize],
        line: &mut ChangingLine,
        row: &mut [u8],
    ) -> Result<(), RowError> {
        let at = cursor.position();
        let (b1, b2) = self.changing_elements(reference);
        let entry = tables::MODES[cursor.read(tables::MODE_BITS) as usize];
        cursor.rewind(usize::from(tables::MODE_BITS - entry.bits));
        trace!("{:?} at a0={:?} b1={} b2={}", entry.mode, self.a0, b1, b2);

        match entry.mode {
            Mode::Pass => {
                let len = b2.min(self.width).saturating_sub(self.pos());
                self.paint(row, len);
            }
            Mode::Horizontal => {
                self.run(cursor, line, row)?;
                self.run(cursor, line, row)?;
            }
            Mode::Vertical(offset) => {
                let a1 = b1
                    .checked_add_signed(isize::from(offset))
                    .filter(|a1| *a1 >= self.pos())
                    .ok_or(RowError::InvalidCode(at))?;
                self.change_at(line, row, a1.min(self.width));
            }
            Mode::Extension => self.uncompressed(cursor, line, row, at)?,
            Mode::Invalid => return Err(RowError::InvalidCode(at)),
        }
        Ok(())
    }

    /// Decode uncompressed mode, up to and including its exit code
    fn uncompressed(
        &mut self,
        cursor: &mut BitCursor,
        line: &mut ChangingLine,
        row: &mut [u8],
        at: usize,
    ) -> Result<(), RowError> {
        if cursor.read(3) != 0b111 {
            cursor.rewind(cursor.position() - at);
            return Err(RowError::InvalidCode(at));
        }
        loop {
            let mut zeros = 0;
            while cursor.read(1) == 0 {
                zeros += 1;
                if zeros > 10 {
                    return Err(RowError::InvalidCode(at));
                }
            }
            match zeros {
                0..=4 => {
                    self.literal(line, row, Color::White, zeros);
                    self.literal(line, row, Color::Black, 1);
                }
                5 => self.literal(line, row, Color::White, 5),
                _ => {
                    self.literal(line, row, Color::White, zeros - 6);
                    let next = Color::from(cursor.read(1) == 1);
                    if next != self.color {
                        line.push(self.pos());
                        self.color = next;
                    }
                    return Ok(());
                }
            }
        }
    }

    fn literal(&mut self, line: &mut ChangingLine, row: &mut [u8], color: Color, count: usize) {
        if count == 0 {
            return;
        }
        if color != self.color {
            line.push(self.pos());
            self.color = color;
        }
        self.paint(row, count);
    }
}
