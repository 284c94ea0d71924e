//! Decode a fax file and write the result
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use ccitt_t4_t6::{ascii_art, decode, write_pbm, Bitmap};
use color_eyre::eyre::{self, WrapErr};
use image::ImageFormat;
use log::info;

use super::opt::{Format, Options};

fn out_path(opt: &Options) -> PathBuf {
    opt.out
        .clone()
        .unwrap_or_else(|| opt.file.with_extension(opt.format.to_string()))
}

fn save_pbm(bitmap: &Bitmap, opt: &Options) -> eyre::Result<PathBuf> {
    let out_path = out_path(opt);
    let file = File::create(&out_path)
        .wrap_err_with(|| format!("Failed to create file: `{}`", out_path.display()))?;
    let mut writer = BufWriter::new(file);
    write_pbm(&mut writer, bitmap, opt.double)?;
    writer.flush()?;
    Ok(out_path)
}

/// Decode `buffer` with the parameters from `opt` and write the image
pub fn process_fax(buffer: &[u8], opt: &Options) -> eyre::Result<()> {
    let params = opt
        .params()
        .wrap_err("Failed to load parameters")?
        .decode_params()?;
    info!(
        "Decoding {} data, {} pixels per row",
        params.coding(),
        params.columns
    );
    let bitmap = decode(buffer, &params)?;
    info!("Decoded {}x{} pixels", bitmap.width(), bitmap.height());

    match opt.format {
        Format::Png => {
            let out_path = out_path(opt);
            let image = bitmap.to_image()?;
            image.save_with_format(&out_path, ImageFormat::Png)?;
            info!("Saved image as '{}'", out_path.display());
        }
        Format::Pbm => {
            let out_path = save_pbm(&bitmap, opt)?;
            info!("Saved image as '{}'", out_path.display());
        }
        Format::Plain => {
            let mut out = String::new();
            ascii_art(&mut out, &bitmap, false)?;
            match &opt.out {
                Some(out_path) => {
                    std::fs::write(out_path, out)?;
                    info!("Saved image as '{}'", out_path.display());
                }
                None => print!("{}", out),
            }
        }
    }

    Ok(())
}
