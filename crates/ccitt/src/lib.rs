#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! CCITT fax decoding
//!
//! This crate decodes images that were compressed with the ITU-T T.4
//! (Group 3, 1D and mixed 1D/2D) or T.6 (Group 4) schemes, as used by the
//! `CCITTFaxDecode` filter of PDF files and by TIFF files.
//!
//! ```
//! use ccitt_t4_t6::{decode, DecodeParams};
//!
//! // one row of 8 white pixels in Group 4: V0
//! let params = DecodeParams { columns: 8, rows: 1, k: -1, black_is_1: true, ..Default::default() };
//! let bitmap = decode(&[0b1000_0000], &params).unwrap();
//! assert_eq!(bitmap.as_bytes(), &[0]);
//! ```

mod ascii_art;
mod bitmap;
pub mod bits;
mod color;
mod decode;
#[cfg(test)]
mod encode;
mod error;
mod g3;
mod g42d;
mod scanline;
mod session;
pub mod tables;

pub use ascii_art::{ascii_art, write_pbm};
pub use bitmap::Bitmap;
pub use bits::FillOrder;
pub use color::Color;
pub use decode::{decode, try_decode, Coding, DecodeParams, MAX_BITMAP_BYTES, MAX_COLUMNS};
pub use error::{DecodeFailure, FaxError, FaxResult};
