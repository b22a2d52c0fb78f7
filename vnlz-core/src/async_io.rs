//! Async I/O wrappers around the synchronous decoders.
//!
//! Decoding itself never suspends: it is pure computation over bytes already
//! in memory. The only blocking part is fetching the compressed bytes, so
//! these helpers read them from a Tokio [`AsyncRead`] and then run the
//! synchronous decode.
//!
//! # Example
//!
//! ```rust,ignore
//! use vnlz_core::async_io::read_and_decode_async;
//!
//! let decoded = read_and_decode_async(&decoder, &mut file, Some(packed), unpacked).await?;
//! ```
//!
//! # Feature Flag
//!
//! This module is only available when the `async-io` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! vnlz-core = { version = "0.1.0", features = ["async-io"] }
//! ```

use crate::error::{LzError, Result};
use crate::sink::Decoded;
use crate::traits::Decompress;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read compressed bytes from `input` and decode them.
///
/// # Arguments
///
/// * `decoder` - Any synchronous decoder
/// * `input` - Async reader positioned at the start of the compressed stream
/// * `compressed_len` - Exact packed size if the container declares one;
///   `None` reads to end of input
/// * `target_length` - Declared unpacked size
///
/// # Errors
///
/// I/O errors while reading, or any error from the decoder.
pub async fn read_and_decode_async<D, R>(
    decoder: &D,
    input: &mut R,
    compressed_len: Option<usize>,
    target_length: usize,
) -> Result<Decoded>
where
    D: Decompress + ?Sized,
    R: AsyncRead + Unpin,
{
    let compressed = read_compressed(input, compressed_len).await?;
    decoder.decode(&compressed, target_length)
}

/// Decode from `input` and write the produced bytes to `output`.
///
/// # Returns
///
/// The number of bytes written to `output`.
pub async fn decode_to_writer_async<D, R, W>(
    decoder: &D,
    input: &mut R,
    output: &mut W,
    compressed_len: Option<usize>,
    target_length: usize,
) -> Result<usize>
where
    D: Decompress + ?Sized,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let decoded = read_and_decode_async(decoder, input, compressed_len, target_length).await?;
    output.write_all(decoded.as_bytes()).await?;
    output.flush().await?;
    Ok(decoded.produced())
}

/// Decode several independent streams concurrently.
///
/// Each job is `(reader, compressed_len, target_length)`. Results come back
/// in job order.
pub async fn decode_concurrent<D, R>(
    decoder: Arc<D>,
    jobs: Vec<(R, Option<usize>, usize)>,
) -> Vec<Result<Decoded>>
where
    D: Decompress + Send + Sync + 'static,
    R: AsyncRead + Unpin + Send + 'static,
{
    use tokio::task::JoinSet;

    let mut join_set = JoinSet::new();
    let job_count = jobs.len();

    for (index, (mut input, compressed_len, target_length)) in jobs.into_iter().enumerate() {
        let decoder = Arc::clone(&decoder);
        join_set.spawn(async move {
            let result =
                read_and_decode_async(decoder.as_ref(), &mut input, compressed_len, target_length)
                    .await;
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<Decoded>>> = (0..job_count).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => {
                // A panicked task leaves its slot empty; it is reported below.
                tracing::error!("decode task failed: {e}");
            }
        }
    }

    results
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| Err(LzError::Io(std::io::Error::other("decode task failed"))))
        })
        .collect()
}

async fn read_compressed<R: AsyncRead + Unpin>(
    input: &mut R,
    compressed_len: Option<usize>,
) -> Result<Vec<u8>> {
    match compressed_len {
        Some(len) => {
            let mut buf = vec![0u8; len];
            input.read_exact(&mut buf).await?;
            Ok(buf)
        }
        None => {
            let mut buf = Vec::new();
            input.read_to_end(&mut buf).await?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::OutputSink;
    use std::io::Cursor;

    /// Expands each input byte `b` into `b` repeated twice.
    struct Doubler;

    impl Decompress for Doubler {
        fn decode(&self, input: &[u8], target_length: usize) -> Result<Decoded> {
            let mut sink = OutputSink::new(target_length);
            let mut consumed = 0;
            for &b in input {
                if sink.is_full() {
                    break;
                }
                sink.push(b);
                sink.push(b);
                consumed += 1;
            }
            Ok(sink.finish(consumed, false))
        }
    }

    #[tokio::test]
    async fn test_read_and_decode() {
        let mut input = Cursor::new(b"abc".to_vec());
        let decoded = read_and_decode_async(&Doubler, &mut input, None, 6)
            .await
            .unwrap();
        assert_eq!(decoded.as_bytes(), b"aabbcc");
    }

    #[tokio::test]
    async fn test_exact_compressed_len() {
        let mut input = Cursor::new(b"abcdef".to_vec());
        let decoded = read_and_decode_async(&Doubler, &mut input, Some(2), 6)
            .await
            .unwrap();
        assert_eq!(decoded.as_bytes(), b"aabb");
        assert!(!decoded.is_complete());
    }

    #[tokio::test]
    async fn test_short_reader_is_io_error() {
        let mut input = Cursor::new(b"a".to_vec());
        let result = read_and_decode_async(&Doubler, &mut input, Some(4), 8).await;
        assert!(matches!(result, Err(LzError::Io(_))));
    }

    #[tokio::test]
    async fn test_decode_to_writer() {
        let mut input = Cursor::new(b"xy".to_vec());
        let mut output = Vec::new();
        let written = decode_to_writer_async(&Doubler, &mut input, &mut output, None, 4)
            .await
            .unwrap();
        assert_eq!(written, 4);
        assert_eq!(output, b"xxyy");
    }

    #[tokio::test]
    async fn test_concurrent_keeps_job_order() {
        let jobs = vec![
            (Cursor::new(b"a".to_vec()), None, 2),
            (Cursor::new(b"bc".to_vec()), None, 4),
            (Cursor::new(b"d".to_vec()), Some(1), 2),
        ];
        let results = decode_concurrent(Arc::new(Doubler), jobs).await;
        let outputs: Vec<Vec<u8>> = results
            .into_iter()
            .map(|r| r.unwrap().into_vec())
            .collect();
        assert_eq!(outputs, vec![b"aa".to_vec(), b"bbcc".to_vec(), b"dd".to_vec()]);
    }
}
