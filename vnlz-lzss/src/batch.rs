//! Parallel decoding of independent streams (requires `parallel` feature).
//!
//! Decodes share nothing but the immutable dialect table, so a batch is
//! simply mapped over the rayon thread pool.

use crate::dialect::DialectTable;
use crate::framing::{SizePrefix, decode_prefixed};
use rayon::prelude::*;
use vnlz_core::error::Result;
use vnlz_core::sink::Decoded;
use vnlz_core::traits::{DecodeMode, Decompress};

/// One stream to decode.
#[derive(Debug, Clone, Copy)]
pub struct BatchJob<'a> {
    /// Compressed bytes.
    pub input: &'a [u8],
    /// Declared unpacked size.
    pub target_length: usize,
}

impl<'a> BatchJob<'a> {
    /// Create a job.
    pub fn new(input: &'a [u8], target_length: usize) -> Self {
        Self {
            input,
            target_length,
        }
    }
}

/// Decode every job in parallel.
///
/// Results are returned in job order; one failing job does not affect the
/// others.
pub fn decode_batch<D>(decoder: &D, jobs: &[BatchJob<'_>]) -> Vec<Result<Decoded>>
where
    D: Decompress + Sync + ?Sized,
{
    jobs.par_iter()
        .map(|job| decoder.decode(job.input, job.target_length))
        .collect()
}

/// Decode size-prefixed streams in parallel.
pub fn decode_prefixed_batch(
    inputs: &[&[u8]],
    prefix: SizePrefix,
    dialect: &DialectTable,
    mode: DecodeMode,
) -> Vec<Result<Decoded>> {
    inputs
        .par_iter()
        .map(|input| decode_prefixed(input, prefix, dialect, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LZ10, OKUMURA};
    use crate::decode::SlidingWindowDecoder;
    use crate::encode::encode;
    use crate::framing::encode_prefixed;

    #[test]
    fn test_batch_preserves_order() {
        let samples: Vec<Vec<u8>> = (0..16u8)
            .map(|i| vec![i; 100 + i as usize])
            .collect();
        let packed: Vec<Vec<u8>> = samples
            .iter()
            .map(|s| encode(s, &OKUMURA).unwrap())
            .collect();
        let jobs: Vec<BatchJob<'_>> = packed
            .iter()
            .zip(&samples)
            .map(|(p, s)| BatchJob::new(p, s.len()))
            .collect();

        let decoder = SlidingWindowDecoder::new(&OKUMURA).unwrap();
        let results = decode_batch(&decoder, &jobs);
        for (result, sample) in results.into_iter().zip(&samples) {
            assert_eq!(result.unwrap().as_bytes(), &sample[..]);
        }
    }

    #[test]
    fn test_prefixed_batch_isolates_failures() {
        let good = encode_prefixed(b"hello hello hello", SizePrefix::Le32, &LZ10).unwrap();
        let bad = [0x01u8, 0x00];
        let inputs: Vec<&[u8]> = vec![good.as_slice(), &bad[..], good.as_slice()];

        let results = decode_prefixed_batch(&inputs, SizePrefix::Le32, &LZ10, DecodeMode::Strict);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().as_bytes(), b"hello hello hello");
    }
}
