//! # Encoder for round trips
//!
//! Writes T.4 mixed and T.6 streams for pages that are given as the
//! changing elements of each row, so decoding can be checked against the
//! source page.

use crate::{
    bitmap::{fill_black, Bitmap},
    bits::BitWriter,
    tables::{self, Mode, EOL, EOL_BITS},
    Color,
};

/// A page as the columns where the color changes in each row
#[derive(Debug, Clone)]
pub(crate) struct Page {
    pub width: usize,
    pub rows: Vec<Vec<usize>>,
}

impl Page {
    /// The packed bitmap, `1` bits are black
    pub fn to_bitmap(&self) -> Bitmap {
        let mut bitmap = Bitmap::new(self.width, self.rows.len());
        for (y, changes) in self.rows.iter().enumerate() {
            let row = bitmap.row_mut(y);
            for pair in changes.chunks(2) {
                let end = pair.get(1).copied().unwrap_or(self.width);
                fill_black(row, pair[0], end - pair[0]);
            }
        }
        bitmap
    }

    /// T.6, optionally with byte-aligned rows, ending with an EOFB
    pub fn encode_t6(&self, byte_align: bool) -> Vec<u8> {
        let mut encoder = Encoder::new(self.width);
        let mut reference: &[usize] = &[];
        for changes in &self.rows {
            encoder.row_2d(reference, changes);
            if byte_align {
                encoder.writer.flush();
            }
            reference = changes;
        }
        encoder.eol();
        encoder.eol();
        encoder.writer.done()
    }

    /// T.4 with a 1D row every `k` rows, ending with an RTC
    pub fn encode_t4(&self, k: usize) -> Vec<u8> {
        let mut encoder = Encoder::new(self.width);
        for (y, changes) in self.rows.iter().enumerate() {
            encoder.eol();
            if y % k == 0 {
                encoder.writer.write(true);
                encoder.row_1d(changes);
            } else {
                encoder.writer.write(false);
                encoder.row_2d(&self.rows[y - 1], changes);
            }
        }
        for _ in 0..6 {
            encoder.eol();
            encoder.writer.write(true);
        }
        encoder.writer.done()
    }
}

struct Encoder {
    writer: BitWriter,
    width: usize,
}

impl Encoder {
    fn new(width: usize) -> Self {
        Self {
            writer: BitWriter::new(),
            width,
        }
    }

    fn code(&mut self, (code, len): (u32, u8)) {
        self.writer.write_bits(code as usize, len);
    }

    fn eol(&mut self) {
        self.code((EOL, EOL_BITS));
    }

    fn run(&mut self, color: Color, mut run: usize) {
        while run >= 2560 {
            self.code(tables::run_code(color, 2560));
            run -= 2560;
        }
        if run >= 64 {
            self.code(tables::run_code(color, (run - run % 64) as u16));
            run %= 64;
        }
        self.code(tables::run_code(color, run as u16));
    }

    fn row_1d(&mut self, changes: &[usize]) {
        let mut color = Color::White;
        let mut a0 = 0;
        for &a1 in changes {
            self.run(color, a1 - a0);
            a0 = a1;
            color.invert();
        }
        self.run(color, self.width - a0);
    }

    /// The first element of `line` right of `a0`
    fn next(&self, line: &[usize], a0: Option<usize>) -> usize {
        line.iter()
            .copied()
            .find(|&pos| a0.map_or(true, |a0| pos > a0))
            .unwrap_or(self.width)
    }

    fn row_2d(&mut self, reference: &[usize], changes: &[usize]) {
        let mut a0: Option<usize> = None;
        let mut color = Color::White;
        while a0.map_or(true, |a0| a0 < self.width) {
            let a1 = self.next(changes, a0);
            // changes to black sit at even indices
            let parity = usize::from(color == Color::Black);
            let (b1, b2) = reference
                .iter()
                .enumerate()
                .find(|&(i, &pos)| i % 2 == parity && a0.map_or(true, |a0| pos > a0))
                .map(|(i, &b1)| (b1, reference.get(i + 1).copied().unwrap_or(self.width)))
                .unwrap_or((self.width, self.width));

            if b2 < a1 {
                self.code(tables::mode_code(Mode::Pass));
                a0 = Some(b2);
            } else if a1.abs_diff(b1) <= 3 {
                let offset = a1 as isize - b1 as isize;
                self.code(tables::mode_code(Mode::Vertical(offset as i8)));
                a0 = Some(a1);
                color.invert();
            } else {
                let a2 = self.next(changes, Some(a1));
                self.code(tables::mode_code(Mode::Horizontal));
                self.run(color, a1 - a0.unwrap_or(0));
                self.run(color.opposite(), a2 - a1);
                a0 = Some(a2);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Page;
    use crate::{
        bitmap::Bitmap,
        bits::BitCursor,
        decode::{try_decode, Coding, DecodeParams},
        session::{DecodeSession, RowMode},
    };

    fn pages() -> impl Strategy<Value = Page> {
        let width = prop_oneof![2..64usize, 64..2600usize];
        (width, 1..12usize).prop_flat_map(|(width, height)| {
            let row = prop::collection::btree_set(0..width, 0..16)
                .prop_map(|changes| changes.into_iter().collect::<Vec<_>>());
            prop::collection::vec(row, height).prop_map(move |rows| Page { width, rows })
        })
    }

    fn params(page: &Page, k: i32, encoded_byte_align: bool) -> DecodeParams {
        DecodeParams {
            columns: page.width,
            rows: 0,
            k,
            encoded_byte_align,
            black_is_1: true,
            ..DecodeParams::default()
        }
    }

    /// Decode a T.6 page row by row and collect the changing elements
    fn changing_lines(data: &[u8], page: &Page, byte_align: bool) -> Vec<Vec<usize>> {
        let mut bitmap = Bitmap::new(page.width, 0);
        let mut session = DecodeSession::new(BitCursor::new(data), page.width, byte_align);
        let mut lines = Vec::new();
        for y in 0..page.rows.len() {
            if let Err(err) = session.decode_row(&mut bitmap, RowMode::TwoD) {
                panic!("row {}: {}", y, err);
            }
            if byte_align {
                session.cursor.align();
            }
            let (_, line) = session.lines.split();
            lines.push(line.as_slice().to_vec());
        }
        lines
    }

    #[test]
    fn test_encode_white_row() {
        let page = Page {
            width: 8,
            rows: vec![vec![]],
        };
        // V0, then EOFB
        assert_eq!(page.encode_t6(false), [0x80, 0x08, 0x00, 0x80]);
        // EOL, tag, white 8, then RTC
        let data = page.encode_t4(1);
        assert_eq!(&data[..3], &[0x00, 0x1c, 0xc0]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn group4_round_trip(page in pages(), byte_align in any::<bool>()) {
            let data = page.encode_t6(byte_align);
            let bitmap = try_decode(&data, &params(&page, -1, byte_align), Coding::Group4);
            prop_assert_eq!(bitmap.ok(), Some(page.to_bitmap()));

            let lines = changing_lines(&data, &page, byte_align);
            for (line, changes) in lines.iter().zip(&page.rows) {
                prop_assert!(line.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", line);
                prop_assert_eq!(line.last(), Some(&page.width));
                let inner: Vec<usize> = line.iter().copied().filter(|&pos| pos < page.width).collect();
                prop_assert_eq!(&inner, changes);
            }
        }

        #[test]
        fn group3_mixed_round_trip(page in pages(), k in 1..5i32) {
            let data = page.encode_t4(k as usize);
            let bitmap = try_decode(&data, &params(&page, k, false), Coding::from_k(k));
            prop_assert_eq!(bitmap.ok(), Some(page.to_bitmap()));
        }
    }
}
