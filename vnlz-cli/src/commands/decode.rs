//! Decode command implementation.

use crate::config::Config;
use crate::utils::skip_header;
use std::path::Path;
use vnlz_core::traits::{DecodeMode, Decompress};
use vnlz_lzss::{SizePrefix, SlidingWindowDecoder, check_declared_size, decode_prefixed};

/// Arguments of `vnlz decode`.
pub struct DecodeArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub dialect: &'a str,
    pub size: Option<usize>,
    pub prefix: Option<SizePrefix>,
    pub skip: usize,
    pub strict: bool,
    pub pad: bool,
}

pub fn cmd_decode(config: &Config, args: &DecodeArgs<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let table = config.resolve(args.dialect)?;
    let mode = if args.strict {
        DecodeMode::Strict
    } else {
        DecodeMode::Lenient
    };

    let raw = std::fs::read(args.input)?;
    let stream = skip_header(&raw, args.skip)?;

    let decoded = match (args.size, args.prefix) {
        (_, Some(prefix)) => decode_prefixed(stream, prefix, &table, mode)?,
        (Some(size), None) => SlidingWindowDecoder::new(&table)?
            .with_mode(mode)
            .decode(stream, check_declared_size(size)?)?,
        (None, None) => return Err("either --size or --prefix is required".into()),
    };

    let bytes = if args.pad {
        decoded.padded()
    } else {
        decoded.as_bytes()
    };
    std::fs::write(args.output, bytes)?;

    println!(
        "{} -> {} ({}): {} of {} bytes from {} input bytes{}",
        args.input.display(),
        args.output.display(),
        table.name,
        decoded.produced(),
        decoded.expected(),
        decoded.consumed(),
        if decoded.terminated() { ", terminated" } else { "" }
    );
    if !decoded.is_complete() {
        eprintln!(
            "Warning: stream ended {} bytes short of the declared size",
            decoded.expected() - decoded.produced()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vnlz_lzss::LzError;

    #[test]
    fn test_oversized_size_rejected() {
        let dir = std::env::temp_dir().join(format!("vnlz-decode-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.lz");
        let output = dir.join("out.bin");
        std::fs::write(&input, [0xFF, b'a', b'b']).unwrap();

        let args = DecodeArgs {
            input: &input,
            output: &output,
            dialect: "okumura",
            size: Some(usize::MAX),
            prefix: None,
            skip: 0,
            strict: false,
            pad: false,
        };
        let err = cmd_decode(&Config::default(), &args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LzError>(),
            Some(LzError::InvalidHeader { .. })
        ));
        assert!(!output.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
