//! # Draw a bitmap as text
use std::{fmt, io, iter::Peekable};

use crate::{Bitmap, Color};

struct BorderDrawing {
    left: char,
    middle: char,
    right: char,
}

struct BoxDrawing {
    top: BorderDrawing,
    left: char,
    right: char,
    bottom: BorderDrawing,
    ink: char,
    no_ink: char,
}

const UNICODE: &BoxDrawing = &BoxDrawing {
    top: BorderDrawing {
        left: '╔',
        middle: '═',
        right: '╗',
    },
    left: '║',
    right: '║',
    bottom: BorderDrawing {
        left: '╚',
        middle: '═',
        right: '╝',
    },
    ink: '█',
    no_ink: ' ',
};

fn border<W: fmt::Write>(w: &mut W, b: &BorderDrawing, width: usize) -> fmt::Result {
    w.write_char(b.left)?;
    for _ in 0..width {
        w.write_char(b.middle)?;
    }
    w.write_char(b.right)?;
    w.write_char('\n')
}

/// Draw the bitmap using box-drawing characters
///
/// Black pixels are drawn as ink, unless `invert` is set.
pub fn ascii_art<W: fmt::Write>(w: &mut W, bitmap: &Bitmap, invert: bool) -> fmt::Result {
    let b = UNICODE;
    border(w, &b.top, bitmap.width())?;
    for y in 0..bitmap.height() {
        w.write_char(b.left)?;
        for x in 0..bitmap.width() {
            let ink = (bitmap.color(x, y) == Color::Black) ^ invert;
            w.write_char(if ink { b.ink } else { b.no_ink })?;
        }
        w.write_char(b.right)?;
        w.write_char('\n')?;
    }
    border(w, &b.bottom, bitmap.width())
}

/// Write a plain PBM (`P1`) file
///
/// ## Parameters
///
/// - `dbl` - write every line twice, because "Standard" fax is 200 dpi horizontal and 100 dpi vertical
pub fn write_pbm<W: io::Write>(writer: &mut W, bitmap: &Bitmap, dbl: bool) -> io::Result<()> {
    let count = if dbl { 2 } else { 1 };
    writeln!(writer, "P1 {} {}", bitmap.width(), bitmap.height() * count)?;
    for y in RepeatIter::new(0..bitmap.height(), count) {
        for x in 0..bitmap.width() {
            // PBM: 1 is black, 0 is white
            let v = u8::from(bitmap.color(x, y) == Color::Black);
            write!(writer, "{}", v)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

struct RepeatIter<I: Iterator> {
    inner: Peekable<I>,
    rem: usize,
    count: usize,
}

impl<I: Iterator> RepeatIter<I>
where
    I::Item: Copy,
{
    fn new(inner: I, count: usize) -> Self {
        debug_assert!(count > 0);
        Self {
            count,
            rem: count - 1,
            inner: inner.peekable(),
        }
    }
}

impl<T: Copy, I: Iterator<Item = T>> Iterator for RepeatIter<I> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rem == 0 {
            self.rem = self.count - 1;
            self.inner.next()
        } else {
            self.rem -= 1;
            self.inner.peek().copied()
        }
    }
}
