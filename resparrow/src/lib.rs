//! resparrow - comparison harness for the sparrow codec family.
//!
//! Wraps `libsparrow`'s codecs with file plumbing, wall-clock timing,
//! round-trip verification, and report generation for the CLI.

pub mod signal;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use libsparrow::core::{read_literals, read_values};
use libsparrow::elf::decimal_places;
use libsparrow::{Algorithm, BitReader, CodecError};

/// Per-codec results of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct CodecReport {
    pub algorithm: String,
    pub lossless: bool,
    pub encoded_bits: usize,
    pub encoded_bytes: usize,
    /// Encoded size over the raw 64-bit representation; smaller is better.
    pub compression_ratio: f64,
    pub encode_ms: f64,
    pub decode_ms: f64,
    pub max_abs_error: f64,
}

/// Full report of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub input: String,
    pub generated_at: String,
    pub samples: usize,
    pub original_bits: usize,
    pub codecs: Vec<CodecReport>,
}

/// Encodes a signal file, returning the stored byte image and its bit count.
pub fn encode_file(algorithm: Algorithm, input: &Path) -> Result<(Vec<u8>, usize)> {
    let codec = algorithm.create();
    let encoded = codec
        .encode(input)
        .with_context(|| format!("{} encode failed", algorithm))?;
    let bits = encoded.len_bits();
    Ok((encoded.into_bytes(), bits))
}

/// Decodes a stored byte image produced by [`encode_file`].
pub fn decode_bytes(algorithm: Algorithm, bytes: &[u8]) -> Result<Vec<f64>> {
    let codec = algorithm.create();
    let mut reader = BitReader::from_bytes(bytes);
    codec
        .decode(&mut reader)
        .with_context(|| format!("{} decode failed", algorithm))
}

/// Runs every requested algorithm over the signal, verifying each
/// round-trip against its contract.
pub fn compare(input: &Path, algorithms: &[Algorithm]) -> Result<ComparisonReport> {
    let original = read_values(input)?;
    // Decimal-place counts bound the tolerated error of the lossy codecs.
    // They are only recoverable when every line parses; the ELF encoders
    // will fail on such inputs anyway.
    let alphas: Option<Vec<u32>> = read_literals(input)
        .ok()
        .map(|literals| literals.iter().map(|l| decimal_places(&l.text)).collect());

    let mut codecs = Vec::with_capacity(algorithms.len());
    for &algorithm in algorithms {
        let codec = algorithm.create();

        let start = Instant::now();
        let encoded = codec
            .encode(input)
            .with_context(|| format!("{} encode failed", algorithm))?;
        let encode_ms = start.elapsed().as_secs_f64() * 1e3;

        let encoded_bits = encoded.len_bits();
        let bytes = encoded.into_bytes();

        let start = Instant::now();
        let mut reader = BitReader::from_bytes(&bytes);
        let decoded = codec
            .decode(&mut reader)
            .with_context(|| format!("{} decode failed", algorithm))?;
        let decode_ms = start.elapsed().as_secs_f64() * 1e3;

        let max_abs_error = verify(
            codec.is_lossless(),
            &original,
            alphas.as_deref(),
            &decoded,
        )
        .with_context(|| format!("{} round-trip verification failed", algorithm))?;

        codecs.push(CodecReport {
            algorithm: algorithm.to_string(),
            lossless: codec.is_lossless(),
            encoded_bits,
            encoded_bytes: bytes.len(),
            compression_ratio: encoded_bits as f64 / (original.len() * 64) as f64,
            encode_ms,
            decode_ms,
            max_abs_error,
        });
    }

    Ok(ComparisonReport {
        input: input.display().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        samples: original.len(),
        original_bits: original.len() * 64,
        codecs,
    })
}

/// Checks a decoded signal against the original: bit-exact for lossless
/// codecs, within 10^(-alpha) per value for the ELF-composed ones. Returns
/// the largest absolute deviation seen.
fn verify(
    lossless: bool,
    original: &[f64],
    alphas: Option<&[u32]>,
    decoded: &[f64],
) -> Result<f64, CodecError> {
    if decoded.len() != original.len() {
        return Err(CodecError::Reconstruction(format!(
            "decoded {} samples, expected {}",
            decoded.len(),
            original.len()
        )));
    }

    let mut max_abs_error = 0.0f64;
    for (i, (o, d)) in original.iter().zip(decoded.iter()).enumerate() {
        if lossless {
            if o.to_bits() != d.to_bits() {
                return Err(CodecError::Reconstruction(format!(
                    "sample {i} diverged: {o} became {d}"
                )));
            }
            continue;
        }

        let alpha = match alphas {
            Some(alphas) => alphas[i],
            None => {
                return Err(CodecError::Reconstruction(
                    "original literals unavailable for tolerance check".into(),
                ))
            }
        };
        let tolerance = 10f64.powi(-(alpha as i32));
        let error = (o - d).abs();
        if !(error <= tolerance) {
            return Err(CodecError::Reconstruction(format!(
                "sample {i} off by {error:e}, tolerance {tolerance:e}: {o} became {d}"
            )));
        }
        max_abs_error = max_abs_error.max(error);
    }

    Ok(max_abs_error)
}
