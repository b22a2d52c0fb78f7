//! Batch command implementation.

use crate::config::Config;
use crate::utils::{batch_output_path, create_progress_bar, expand_patterns, skip_header};
use std::path::{Path, PathBuf};
use vnlz_core::traits::DecodeMode;
use vnlz_lzss::{SizePrefix, decode_prefixed_batch};

/// Arguments of `vnlz batch`.
pub struct BatchArgs<'a> {
    pub patterns: &'a [String],
    pub output: &'a Path,
    pub dialect: &'a str,
    pub prefix: SizePrefix,
    pub skip: usize,
    pub strict: bool,
    pub progress: bool,
}

pub fn cmd_batch(config: &Config, args: &BatchArgs<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let table = config.resolve(args.dialect)?;
    let mode = if args.strict {
        DecodeMode::Strict
    } else {
        DecodeMode::Lenient
    };

    let files = expand_patterns(args.patterns)?;
    if files.is_empty() {
        return Err("no input files".into());
    }
    std::fs::create_dir_all(args.output)?;

    // Unreadable files are reported and skipped; the rest decode in parallel.
    let mut failed = 0usize;
    let mut loaded: Vec<(PathBuf, Vec<u8>)> = Vec::with_capacity(files.len());
    for path in files {
        match std::fs::read(&path) {
            Ok(data) => loaded.push((path, data)),
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    let mut streams: Vec<&[u8]> = Vec::with_capacity(loaded.len());
    let mut names: Vec<&Path> = Vec::with_capacity(loaded.len());
    for (path, data) in &loaded {
        match skip_header(data, args.skip) {
            Ok(stream) => {
                streams.push(stream);
                names.push(path);
            }
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    tracing::info!(files = streams.len(), dialect = %table.name, "batch decode");
    let results = decode_prefixed_batch(&streams, args.prefix, &table, mode);

    let pb = create_progress_bar(results.len() as u64, args.progress);
    let mut succeeded = 0usize;
    let mut total_out = 0usize;
    for (path, result) in names.into_iter().zip(results) {
        pb.set_message(path.display().to_string());
        match result {
            Ok(decoded) => {
                let out_path = batch_output_path(args.output, path);
                match std::fs::write(&out_path, decoded.as_bytes()) {
                    Ok(()) => {
                        succeeded += 1;
                        total_out += decoded.produced();
                    }
                    Err(e) => {
                        pb.suspend(|| eprintln!("{}: {}", out_path.display(), e));
                        failed += 1;
                    }
                }
                if !decoded.is_complete() {
                    pb.suspend(|| {
                        eprintln!(
                            "{}: short stream, {} of {} bytes",
                            path.display(),
                            decoded.produced(),
                            decoded.expected()
                        )
                    });
                }
            }
            Err(e) => {
                pb.suspend(|| eprintln!("{}: {}", path.display(), e));
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "Decoded {} files ({} bytes) into {}",
        succeeded,
        total_out,
        args.output.display()
    );

    if failed > 0 {
        return Err(format!("{failed} file(s) failed").into());
    }
    Ok(())
}
