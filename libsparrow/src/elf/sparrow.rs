//! Sparrow with per-value ELF erasure.
//!
//! The stream is a sparrow stream whose header additionally carries the
//! sample count, and whose records are ELF-aware: a 1-bit nonzero marker
//! (exact zeros store nothing else), an erased flag with a 4-bit beta* when
//! set, the sparrow control bit and prefix, a 6-bit kept-length, and the
//! kept significand bits. Erased values keep residual bits only down to the
//! erasure position; everything below is zero-filled at decode and restored
//! by the round-up reconstruction.

use std::path::Path;

use crate::codec::Codec;
use crate::core::{
    bitmask, read_literals, BitBuffer, BitReader, CodecError, CodecResult, Literal,
};
use crate::sparrow::{leading_zero_histogram, read_header, select_window, window_prefix_len};
use crate::spectral::SpectralModel;

use super::{analyze, restore_truncated, should_erase, BETA_STAR_BITS};

/// The sparrow + ELF codec.
pub struct SparrowElf;

impl Codec for SparrowElf {
    fn name(&self) -> &'static str {
        "sparrow-elf"
    }

    fn encode(&self, input: &Path) -> CodecResult<BitBuffer> {
        let literals = read_literals(input)?;
        encode_literals(&literals)
    }

    fn decode(&self, reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
        decode_reader(reader)
    }

    fn is_lossless(&self) -> bool {
        false
    }
}

/// Encodes a signal, using the literal text of each value to bound the
/// precision that must survive.
pub fn encode_literals(literals: &[Literal]) -> CodecResult<BitBuffer> {
    let n = literals.len();
    if n == 0 {
        return Err(CodecError::Parse("empty signal".into()));
    }

    let values: Vec<f64> = literals.iter().map(|l| l.value).collect();
    let model = SpectralModel::select(&values);
    let approx = model.reconstruct(n);

    let residuals: Vec<u64> = approx
        .iter()
        .zip(values.iter())
        .map(|(a, v)| a.to_bits() ^ v.to_bits())
        .collect();

    let histogram = leading_zero_histogram(&residuals);
    let wl = select_window(&histogram);
    let prefix_len = window_prefix_len(wl);

    let mut out = BitBuffer::with_capacity(n * 8);
    out.write_bits(model.len() as u64, 16);
    for component in &model.components {
        out.write_bits(component.frequency.to_bits(), 64);
        out.write_bits(component.amplitude.to_bits(), 64);
        out.write_bits(component.phase.to_bits(), 64);
    }
    out.write_bits(wl as u64, 16);
    out.write_bits(n as u64, 64);

    for (literal, &residual) in literals.iter().zip(residuals.iter()) {
        if literal.value == 0.0 {
            out.write_bit(false);
            continue;
        }
        out.write_bit(true);

        let info = analyze(literal);
        let erased = should_erase(literal.value.to_bits(), info.position, info.beta_star);

        out.write_bit(erased);
        if erased {
            out.write_bits(info.beta_star as u64, BETA_STAR_BITS);
        }

        let leading_zeros = residual.leading_zeros();
        let control = leading_zeros >= wl;
        let leading_offset = if control { wl } else { leading_zeros };

        out.write_bit(control);
        if !control {
            out.write_bits(leading_zeros as u64, prefix_len);
        }

        // Significand spans MSB-indices [leading_offset, 63]; keep either up
        // to the erasure position or up to the last set bit.
        let significand_len = 64 - leading_offset;
        let kept_len: u32 = if erased {
            (info.position - leading_offset as i32 + 1).clamp(0, significand_len as i32) as u32
        } else if residual == 0 {
            0
        } else {
            // The 6-bit length field cannot express 64; a full-width
            // significand loses its last trailing bit to the clamp.
            (significand_len - residual.trailing_zeros()).min(63)
        };

        out.write_bits(kept_len as u64, 6);
        if kept_len > 0 {
            let shift = 64 - leading_offset - kept_len;
            out.write_bits((residual >> shift) & bitmask(kept_len), kept_len);
        }
    }

    Ok(out)
}

enum Record {
    Zero,
    Value { residual: u64, beta_star: Option<u32> },
}

/// Decodes a sparrow-elf stream back into the signal, exact for unerased
/// values and correct to beta* significant digits for erased ones.
pub fn decode_reader(reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
    let (model, wl) = read_header(reader)?;
    let prefix_len = window_prefix_len(wl);
    let n = reader
        .read_bits(64)
        .ok_or_else(|| CodecError::unexpected_end("sample count"))? as usize;

    // Every record costs at least one bit, which bounds any declared count.
    let mut records = Vec::with_capacity(n.min(reader.remaining()));
    for _ in 0..n {
        let nonzero = reader
            .read_bit()
            .ok_or_else(|| CodecError::unexpected_end("zero marker"))?;
        if !nonzero {
            records.push(Record::Zero);
            continue;
        }

        let erased = reader
            .read_bit()
            .ok_or_else(|| CodecError::unexpected_end("erased flag"))?;
        let beta_star = if erased {
            Some(
                reader
                    .read_bits(BETA_STAR_BITS)
                    .ok_or_else(|| CodecError::unexpected_end("beta* field"))? as u32,
            )
        } else {
            None
        };

        let control = reader
            .read_bit()
            .ok_or_else(|| CodecError::unexpected_end("control bit"))?;
        let leading_offset = if control {
            wl
        } else {
            reader
                .read_bits(prefix_len)
                .ok_or_else(|| CodecError::unexpected_end("leading-zero prefix"))? as u32
        };

        let kept_len = reader
            .read_bits(6)
            .ok_or_else(|| CodecError::unexpected_end("kept-length field"))? as u32;
        if leading_offset + kept_len > 64 {
            return Err(CodecError::Format(format!(
                "kept significand (offset {leading_offset}, length {kept_len}) exceeds 64 bits"
            )));
        }

        let residual = if kept_len == 0 {
            0
        } else {
            let payload = reader
                .read_bits(kept_len)
                .ok_or_else(|| CodecError::unexpected_end("kept significand"))?;
            payload << (64 - leading_offset - kept_len)
        };

        records.push(Record::Value {
            residual,
            beta_star,
        });
    }

    let approx = model.reconstruct(n);

    Ok(records
        .iter()
        .zip(approx.iter())
        .map(|(record, a)| match record {
            Record::Zero => 0.0,
            Record::Value {
                residual,
                beta_star,
            } => {
                let v_prime = f64::from_bits(a.to_bits() ^ residual);
                match beta_star {
                    Some(beta) => restore_truncated(v_prime, *beta),
                    None => v_prime,
                }
            }
        })
        .collect())
}
