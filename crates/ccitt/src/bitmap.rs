//! # Packed bi-level bitmap

use crate::Color;

/// A packed 1-bit-per-pixel image
///
/// Rows are byte-aligned, the first pixel of a row is the most significant
/// bit of its first byte. Bits past the width of a row are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    stride: usize,
    black_is_1: bool,
    data: Vec<u8>,
}

impl Bitmap {
    /// Create a white bitmap where `1` bits are black
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(8);
        Self {
            width,
            height,
            stride,
            black_is_1: true,
            data: vec![0; stride * height],
        }
    }

    /// Pixels per row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row, `ceil(width / 8)`
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether a set bit is a black pixel
    pub fn black_is_1(&self) -> bool {
        self.black_is_1
    }

    /// The packed rows
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Turn the bitmap into the packed rows
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The bytes of row `y`
    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..][..self.stride]
    }

    /// Iterate over the rows
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(self.stride.max(1))
    }

    /// Whether the bit for pixel `(x, y)` is set
    pub fn bit(&self, x: usize, y: usize) -> bool {
        self.row(y)[x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// The color of pixel `(x, y)`
    pub fn color(&self, x: usize, y: usize) -> Color {
        Color::from(self.bit(x, y) == self.black_is_1)
    }

    /// Flip every pixel, keeping the padding bits zero
    pub fn invert(&mut self) {
        for byte in &mut self.data {
            *byte = !*byte;
        }
        self.clear_padding();
        self.black_is_1 = !self.black_is_1;
    }

    /// Reset the bits past the width of each row
    pub(crate) fn clear_padding(&mut self) {
        let pad = (self.stride * 8 - self.width) as u32;
        let mask = 0xffu8.checked_shl(pad).unwrap_or(0);
        for row in self.data.chunks_exact_mut(self.stride.max(1)) {
            if let Some(byte) = row.last_mut() {
                *byte &= mask;
            }
        }
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.data[y * self.stride..][..self.stride]
    }

    /// Add white rows up to `height`
    pub(crate) fn grow(&mut self, height: usize) {
        if height > self.height {
            self.data.resize(height * self.stride, 0);
            self.height = height;
        }
    }

    /// Drop rows past `height`
    pub(crate) fn truncate(&mut self, height: usize) {
        if height < self.height {
            self.data.truncate(height * self.stride);
            self.height = height;
        }
    }
}

/// Set `len` bits starting at bit `start` of a packed row
///
/// Bits past the end of the row are ignored.
pub(crate) fn fill_black(row: &mut [u8], start: usize, len: usize) {
    let end = (start + len).min(row.len() * 8);
    if start >= end {
        return;
    }
    let (first, last) = (start / 8, (end - 1) / 8);
    let head = 0xffu8 >> (start % 8);
    let tail = 0xffu8 << (7 - (end - 1) % 8);
    if first == last {
        row[first] |= head & tail;
    } else {
        row[first] |= head;
        for byte in &mut row[first + 1..last] {
            *byte = 0xff;
        }
        row[last] |= tail;
    }
}

#[cfg(feature = "image")]
#[cfg_attr(docsrs, doc(cfg(feature = "image")))]
impl Bitmap {
    /// Turn the bitmap into a `GrayImage` from the `image` crate
    ///
    /// Fails with [`FaxError::TooLarge`](crate::FaxError::TooLarge) if a
    /// dimension does not fit into a `u32`.
    pub fn to_image(&self) -> crate::FaxResult<image::GrayImage> {
        let too_large = || crate::FaxError::TooLarge {
            columns: self.width,
            rows: self.height,
        };
        let width = u32::try_from(self.width).map_err(|_| too_large())?;
        let height = u32::try_from(self.height).map_err(|_| too_large())?;
        Ok(image::GrayImage::from_fn(width, height, |x, y| {
            match self.color(x as usize, y as usize) {
                Color::Black => image::Luma([0x00]),
                Color::White => image::Luma([0xff]),
            }
        }))
    }
}
