//! Command line options
use std::{borrow::Cow, fmt, io, path::PathBuf, str::FromStr};

use ccitt_t4_t6::{DecodeParams, FaxResult, FillOrder};
use clap::Parser;
use serde::Deserialize;
use thiserror::*;

mod de;
use de::{deserialize_opt_i32, deserialize_opt_u16, deserialize_opt_usize};

/// The format to export the image into
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    /// Portable Network Graphic
    Png,
    /// Portable Bitmap Format (plain)
    Pbm,
    /// Box-drawing characters on the console
    Plain,
}

#[derive(Debug)]
/// Failed to parse a format name
pub struct FormatError {}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Use one of `png`, `pbm` or `txt`")?;
        Ok(())
    }
}

impl std::error::Error for FormatError {}

impl Default for Format {
    fn default() -> Self {
        Format::Png
    }
}

impl FromStr for Format {
    type Err = FormatError;
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "png" => Ok(Self::Png),
            "pbm" => Ok(Self::Pbm),
            "txt" | "plain" => Ok(Self::Plain),
            _ => Err(FormatError {}),
        }
    }
}

impl Format {
    fn to_static_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pbm => "pbm",
            Self::Plain => "txt",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_static_str())
    }
}

#[derive(Parser)]
/// Convert CCITT Group 3 or Group 4 fax data to an image
pub struct Options {
    /// The file with the raw compressed data
    pub file: PathBuf,
    /// Where to store the output
    pub out: Option<PathBuf>,
    /// Format of the output. Valid choices are:
    ///
    /// "png", "pbm" and "txt"
    #[clap(default_value_t, long, short = 'F')]
    pub format: Format,
    /// Write every row twice (standard resolution faxes)
    #[clap(long)]
    pub double: bool,

    /// Decoding parameters passed as command line args
    #[clap(flatten)]
    pub cl_params: Params,

    /// Decoding parameters as a file
    #[clap(long)]
    pub params: Option<PathBuf>,
}

/// Failed to load the parameter file
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Reading the file failed
    #[error("IO Error")]
    Io(#[from] io::Error),
    /// The file is not valid RON
    #[error("Deserialize Error")]
    Ron(#[from] ron::error::Error),
}

impl Options {
    /// The parameters from the file, overridden by the command line
    pub fn params(&self) -> Result<Cow<Params>, ParamsError> {
        if let Some(params_path) = &self.params {
            let text = std::fs::read_to_string(params_path)?;
            let mut params: Params = ron::from_str(&text)?;
            params.merge(&self.cl_params);
            Ok(Cow::Owned(params))
        } else {
            Ok(Cow::Borrowed(&self.cl_params))
        }
    }
}

/// The parameters of a `CCITTFaxDecode` filter
#[derive(Debug, Default, Clone, Parser, Deserialize)]
pub struct Params {
    /// Pixels per row [default: 1728]
    #[clap(long)]
    #[serde(default, deserialize_with = "deserialize_opt_usize")]
    pub columns: Option<usize>,
    /// Number of rows, 0 to decode until the end of the data
    #[clap(long)]
    #[serde(default, deserialize_with = "deserialize_opt_usize")]
    pub rows: Option<usize>,
    /// Coding scheme (<0: Group 4, 0: Group 3 1D, >0: Group 3 2D)
    #[clap(short, allow_hyphen_values = true)]
    #[serde(default, deserialize_with = "deserialize_opt_i32")]
    pub k: Option<i32>,
    /// Rows (or EOLs) start on a byte boundary
    #[clap(long)]
    #[serde(default)]
    pub encoded_byte_align: bool,
    /// 1 bits in the data are black
    #[clap(long)]
    #[serde(default)]
    pub black_is_1: bool,
    /// Bit order within a byte (1: MSB first, 2: LSB first)
    #[clap(long)]
    #[serde(default, deserialize_with = "deserialize_opt_u16")]
    pub fill_order: Option<u16>,
}

impl Params {
    /// Apply the values that are set in `other`
    pub fn merge(&mut self, other: &Params) {
        if let Some(columns) = other.columns {
            self.columns = Some(columns);
        }
        if let Some(rows) = other.rows {
            self.rows = Some(rows);
        }
        if let Some(k) = other.k {
            self.k = Some(k);
        }
        self.encoded_byte_align |= other.encoded_byte_align;
        self.black_is_1 |= other.black_is_1;
        if let Some(fill_order) = other.fill_order {
            self.fill_order = Some(fill_order);
        }
    }

    /// The parameters for the decoder
    pub fn decode_params(&self) -> FaxResult<DecodeParams> {
        let defaults = DecodeParams::default();
        let fill_order = match self.fill_order {
            Some(tag) => FillOrder::try_from(tag)?,
            None => defaults.fill_order,
        };
        Ok(DecodeParams {
            columns: self.columns.unwrap_or(defaults.columns),
            rows: self.rows.unwrap_or(defaults.rows),
            k: self.k.unwrap_or(defaults.k),
            encoded_byte_align: self.encoded_byte_align,
            black_is_1: self.black_is_1,
            fill_order,
        })
    }
}
