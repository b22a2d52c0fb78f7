//! Encode command implementation.

use crate::config::Config;
use crate::utils::savings;
use std::path::Path;
use vnlz_lzss::{MatchingEncoder, SizePrefix, encode_prefixed};
use vnlz_core::traits::Compress;

pub fn cmd_encode(
    config: &Config,
    input: &Path,
    output: &Path,
    dialect: &str,
    prefix: Option<SizePrefix>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = config.resolve(dialect)?;
    let data = std::fs::read(input)?;

    let packed = match prefix {
        Some(prefix) => encode_prefixed(&data, prefix, &table)?,
        None => MatchingEncoder::new(&table)?.encode(&data)?,
    };
    std::fs::write(output, &packed)?;

    println!(
        "{} -> {} ({}): {} -> {} bytes, {} saved",
        input.display(),
        output.display(),
        table.name,
        data.len(),
        packed.len(),
        savings(data.len(), packed.len())
    );

    Ok(())
}
