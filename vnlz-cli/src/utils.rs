//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use vnlz_core::error::LzError;

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Expand glob patterns into a sorted, de-duplicated list of files.
///
/// A pattern without glob metacharacters is taken literally, so plain file
/// names that do not exist are reported instead of silently dropped.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            files.push(PathBuf::from(pattern));
            continue;
        }
        let mut matched = false;
        for entry in glob::glob(pattern)? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
                matched = true;
            }
        }
        if !matched {
            tracing::warn!(pattern = %pattern, "pattern matched no files");
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Drop `skip` bytes of container header.
pub fn skip_header(data: &[u8], skip: usize) -> Result<&[u8], LzError> {
    data.get(skip..).ok_or_else(|| {
        LzError::invalid_header(format!(
            "cannot skip {skip} bytes of a {} byte input",
            data.len()
        ))
    })
}

/// Output path for a batch input: `<dir>/<file name>.out`.
pub fn batch_output_path(dir: &Path, input: &Path) -> PathBuf {
    let mut name = input
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "stream".into());
    name.push(".out");
    dir.join(name)
}

/// Format a size ratio as a percentage saved.
pub fn savings(original: usize, packed: usize) -> String {
    if original == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", (1.0 - packed as f64 / original as f64) * 100.0)
}
