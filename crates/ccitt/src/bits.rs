//! # Bit Cursor and Writer

/// Number of bits that [`BitCursor::read`] can return at once
pub const MAX_READ: u8 = 20;

/// `LOW_MASK[n]` keeps the `n` least significant bits of a byte
const LOW_MASK: [u8; 9] = [0x00, 0x01, 0x03, 0x07, 0x0f, 0x1f, 0x3f, 0x7f, 0xff];
/// `HIGH_MASK[n]` keeps the `n` most significant bits of a byte
const HIGH_MASK: [u8; 9] = [0x00, 0x80, 0xc0, 0xe0, 0xf0, 0xf8, 0xfc, 0xfe, 0xff];

const fn reversal_table() -> [u8; 256] {
    let mut table = [0; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).reverse_bits();
        i += 1;
    }
    table
}

/// `REVERSED[b]` is `b` with its bit order flipped
pub static REVERSED: [u8; 256] = reversal_table();

/// Order of writing/reading bits to/from a byte (see TIFF spec)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillOrder {
    /// A byte is iterated from most- to least-significant bit
    #[default]
    MsbToLsb = 1,
    /// A byte is iterated from least- to most-significant bit
    LsbToMsb = 2,
}

impl FillOrder {
    /// Get the fill order for a `FillOrder` tag value
    pub fn from_tag(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::MsbToLsb),
            2 => Some(Self::LsbToMsb),
            _ => None,
        }
    }

    /// Bring a raw byte into most- to least-significant order
    fn normalize(self, byte: u8) -> u8 {
        match self {
            Self::MsbToLsb => byte,
            Self::LsbToMsb => REVERSED[byte as usize],
        }
    }
}

/// A read position with bit granularity in a byte slice
///
/// Reads past the end of the data yield zero bits, but still move the
/// cursor, so that [`BitCursor::position`] may exceed [`BitCursor::bit_len`].
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    fill_order: FillOrder,
    byte: usize,
    /// Always in `0..8`
    bit: u8,
}

impl<'a> BitCursor<'a> {
    /// Creates a new instance at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_fill_order(data, FillOrder::MsbToLsb)
    }

    /// Creates a new instance that reads bytes in the given order
    pub fn with_fill_order(data: &'a [u8], fill_order: FillOrder) -> Self {
        Self {
            data,
            fill_order,
            byte: 0,
            bit: 0,
        }
    }

    fn byte_at(&self, index: usize) -> u8 {
        self.data
            .get(index)
            .map_or(0, |b| self.fill_order.normalize(*b))
    }

    /// Read the next `n` bits, first bit in the most significant position
    ///
    /// `n` must be in `1..=20`.
    pub fn read(&mut self, n: u8) -> u32 {
        debug_assert!(n >= 1 && n <= MAX_READ);
        let left = 8 - self.bit;
        let first = self.byte_at(self.byte) & LOW_MASK[left as usize];
        if n < left {
            self.bit += n;
            return u32::from(first >> (left - n));
        }

        let mut value = u32::from(first);
        let mut todo = n - left;
        self.byte += 1;
        self.bit = 0;
        while todo >= 8 {
            value = value << 8 | u32::from(self.byte_at(self.byte));
            self.byte += 1;
            todo -= 8;
        }
        if todo > 0 {
            let last = self.byte_at(self.byte) & HIGH_MASK[todo as usize];
            value = value << todo | u32::from(last >> (8 - todo));
            self.bit = todo;
        }
        value
    }

    /// Read the next `n` bits without moving the cursor
    pub fn peek(&self, n: u8) -> u32 {
        self.clone().read(n)
    }

    /// Move back by `n` bits, stopping at the start of the data
    pub fn rewind(&mut self, n: usize) {
        self.seek(self.position().saturating_sub(n));
    }

    /// Move forward by `n` bits
    pub fn skip(&mut self, n: usize) {
        self.seek(self.position() + n);
    }

    fn seek(&mut self, pos: usize) {
        self.byte = pos / 8;
        self.bit = (pos % 8) as u8;
    }

    /// Move to the next byte boundary, if not already on one
    pub fn align(&mut self) {
        if self.bit != 0 {
            self.byte += 1;
            self.bit = 0;
        }
    }

    /// Whether the cursor is on a byte boundary
    pub fn is_aligned(&self) -> bool {
        self.bit == 0
    }

    /// The current offset in bits from the start of the data
    pub fn position(&self) -> usize {
        self.byte * 8 + self.bit as usize
    }

    /// The length of the data in bits
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8
    }

    /// The number of bits left before the end of the data
    pub fn remaining(&self) -> usize {
        self.bit_len().saturating_sub(self.position())
    }

    /// Whether only zero bits are left
    pub fn is_exhausted(&self) -> bool {
        let Some(first) = self.data.get(self.byte) else {
            return true;
        };
        let first = self.fill_order.normalize(*first) & LOW_MASK[8 - self.bit as usize];
        first == 0 && self.data[self.byte + 1..].iter().all(|b| *b == 0)
    }
}

/// A bitwise writer
#[derive(Debug, Default)]
pub struct BitWriter {
    buffer: Vec<u8>,
    curr: u8,
    /// Number of bits in `curr`, always in `0..8`
    used: u8,
}

impl BitWriter {
    /// Creates a new instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new instance with the given capacity of bits
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity.div_ceil(8)),
            curr: 0,
            used: 0,
        }
    }

    /// Write a single bit
    pub fn write(&mut self, b: bool) {
        self.curr = self.curr << 1 | u8::from(b);
        self.used += 1;
        if self.used == 8 {
            self.buffer.push(self.curr);
            self.curr = 0;
            self.used = 0;
        }
    }

    /// Write the `off` low bits of `val`, most significant first
    pub fn write_bits(&mut self, val: usize, off: u8) {
        for i in (0..off).rev() {
            self.write(val >> i & 1 == 1);
        }
    }

    /// Write a code given as a string of `0` and `1`
    pub fn write_code(&mut self, code: &str) {
        for c in code.bytes() {
            self.write(c == b'1');
        }
    }

    /// The number of bits written so far
    pub fn bit_len(&self) -> usize {
        self.buffer.len() * 8 + self.used as usize
    }

    /// Pad with zeros up to the next byte boundary
    pub fn flush(&mut self) {
        if self.used > 0 {
            self.buffer.push(self.curr << (8 - self.used));
            self.curr = 0;
            self.used = 0;
        }
    }

    /// Flush and return the buffer
    pub fn done(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::{BitCursor, BitWriter, FillOrder, REVERSED};

    #[test]
    fn test_reversal_table() {
        assert_eq!(REVERSED[0b0000_0001], 0b1000_0000);
        assert_eq!(REVERSED[0b1100_1010], 0b0101_0011);
        assert_eq!(REVERSED[0xff], 0xff);
    }

    #[test]
    fn test_read_across_bytes() {
        let data = [0b1010_1100, 0b0011_1111, 0b0101_0000];
        let mut cursor = BitCursor::new(&data);
        assert_eq!(cursor.read(3), 0b101);
        assert_eq!(cursor.read(7), 0b0_1100_00);
        assert_eq!(cursor.position(), 10);
        assert_eq!(cursor.read(14), 0b11_1111_0101_0000);
        assert_eq!(cursor.position(), 24);
        assert!(cursor.is_aligned());
    }

    #[test]
    fn test_read_twenty_bits() {
        let data = [0xff, 0x00, 0xff, 0x00];
        let mut cursor = BitCursor::new(&data);
        cursor.skip(2);
        assert_eq!(cursor.read(20), 0b1111_1100_0000_0011_1111);
        assert_eq!(cursor.position(), 22);
    }

    #[test]
    fn test_read_past_end() {
        let data = [0b0000_0011];
        let mut cursor = BitCursor::new(&data);
        assert_eq!(cursor.read(4), 0);
        assert_eq!(cursor.read(12), 0b0011_0000_0000);
        assert_eq!(cursor.position(), 16);
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.read(8), 0);
    }

    #[test]
    fn test_rewind_clamps_at_start() {
        let data = [0b1000_0000];
        let mut cursor = BitCursor::new(&data);
        cursor.read(3);
        cursor.rewind(10);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read(1), 1);
    }

    #[test]
    fn test_peek_does_not_move() {
        let data = [0b0110_0000];
        let cursor = BitCursor::new(&data);
        assert_eq!(cursor.peek(3), 0b011);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_fill_order_lsb_to_msb() {
        let data = [0b0000_0110, 0b1000_0000];
        let mut cursor = BitCursor::with_fill_order(&data, FillOrder::LsbToMsb);
        assert_eq!(cursor.read(4), 0b0110);
        assert_eq!(cursor.read(8), 0b0000_0000);
        assert_eq!(cursor.read(4), 0b0001);
        assert_eq!(FillOrder::from_tag(2), Some(FillOrder::LsbToMsb));
        assert_eq!(FillOrder::from_tag(3), None);
    }

    #[test]
    fn test_exhausted() {
        let data = [0b0000_1000, 0, 0];
        let mut cursor = BitCursor::new(&data);
        assert!(!cursor.is_exhausted());
        cursor.read(4);
        assert!(!cursor.is_exhausted());
        cursor.read(1);
        assert!(cursor.is_exhausted());
        cursor.skip(100);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_align() {
        let data = [0xff, 0xff];
        let mut cursor = BitCursor::new(&data);
        cursor.align();
        assert_eq!(cursor.position(), 0);
        cursor.read(1);
        cursor.align();
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_bit_writer_write_bits() {
        let mut bw = BitWriter::new();
        bw.write_bits(0b000011110000, 12);
        bw.write_bits(0b1010, 4);

        assert_eq!(&bw.buffer, &[0b00001111, 0b00001010]);

        bw.write_bits(0b111111, 6);
        assert_eq!(bw.curr, 0b111111);
        assert_eq!(bw.used, 6);
        assert_eq!(&bw.buffer, &[0b00001111, 0b00001010]);

        bw.write_bits(0b000000, 6);
        assert_eq!(bw.curr, 0b0000);
        assert_eq!(bw.used, 4);
        assert_eq!(&bw.buffer, &[0b00001111, 0b00001010, 0b11111100]);

        bw.write_bits(0b1111, 4);
        assert_eq!(
            &bw.buffer,
            &[0b00001111, 0b00001010, 0b11111100, 0b00001111]
        );
        assert_eq!(bw.curr, 0);
        assert_eq!(bw.used, 0);
    }

    #[test]
    fn test_bit_writer_write() {
        let mut bw = BitWriter::new();
        bw.write_code("10011010");
        assert_eq!(&bw.buffer, &[0b10011010]);

        bw.write_code("11110000");
        assert_eq!(&bw.buffer, &[0b10011010, 0b11110000]);

        bw.write(true);
        bw.write(false);
        bw.write(true);
        assert_eq!(bw.bit_len(), 19);
        bw.flush();

        assert_eq!(&bw.buffer, &[0b10011010, 0b11110000, 0b10100000]);

        bw.flush();

        assert_eq!(&bw.buffer, &[0b10011010, 0b11110000, 0b10100000]);
    }
}
