use std::fs;

use color_eyre::eyre::{self, WrapErr};

use fax_tool::cli::{self, fax::process_fax, opt::Options};

fn main() -> eyre::Result<()> {
    let opt: Options = cli::init()?;

    let buffer = fs::read(&opt.file)
        .wrap_err_with(|| format!("Failed to open file: `{}`", opt.file.display()))?;

    process_fax(&buffer, &opt)
}
