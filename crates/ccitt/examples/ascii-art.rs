use std::path::PathBuf;

use ccitt_t4_t6::{DecodeParams, FillOrder};
use clap::Parser;
use color_eyre::eyre;

#[derive(Parser)]
/// load a CCITT encoded file and write it to console
struct Options {
    /// path to input file
    file: PathBuf,
    /// width of the image
    #[clap(long, default_value_t = 1728)]
    width: usize,
    /// the K parameter (<0: Group 4, 0: Group 3 1D, >0: Group 3 2D)
    #[clap(short, default_value_t = -1, allow_hyphen_values = true)]
    k: i32,
    /// bits are stored least significant first
    #[clap(long)]
    reverse: bool,
    /// invert black and white
    #[clap(long)]
    invert: bool,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opt = Options::parse();
    let file = std::fs::read(&opt.file)?;

    let params = DecodeParams {
        columns: opt.width,
        k: opt.k,
        black_is_1: true,
        fill_order: if opt.reverse {
            FillOrder::LsbToMsb
        } else {
            FillOrder::MsbToLsb
        },
        ..DecodeParams::default()
    };
    let bitmap = ccitt_t4_t6::decode(&file, &params)?;

    let mut string = String::new();
    ccitt_t4_t6::ascii_art(&mut string, &bitmap, opt.invert)?;
    print!("{}", string);

    Ok(())
}
