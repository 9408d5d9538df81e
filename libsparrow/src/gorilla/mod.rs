//! The gorilla delta codec.
//!
//! Consecutive 64-bit values are XORed; only the meaningful window of the
//! XOR (first to last set bit) is stored, and a window declared once is
//! reused for following values whose meaningful span still fits inside it.
//! The scheme follows the value track of Facebook's Gorilla paper, operating
//! here on raw signal values or, in the ELF-composed variant, on erased
//! residual patterns.

mod decoder;
mod encoder;

pub use decoder::decode_reader;
pub use encoder::encode_values;

use std::path::Path;

use crate::codec::Codec;
use crate::core::{bitmask, read_values, BitBuffer, BitReader, CodecError, CodecResult};

/// Widest leading-zero count the 5-bit descriptor field can carry.
pub const MAX_DESCRIBED_LEADING_ZEROS: u32 = 31;

/// The meaningful span of a nonzero XOR pattern.
///
/// Invariant: `leading_zeros + meaningful_bits + trailing_zeros == 64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeaningfulWindow {
    pub leading_zeros: u32,
    pub meaningful_bits: u32,
    pub trailing_zeros: u32,
}

impl MeaningfulWindow {
    /// Builds the window of a nonzero XOR value.
    ///
    /// A leading-zero count above 31 is clamped to 31 so it fits the 5-bit
    /// descriptor; the meaningful span widens accordingly, so the clamp
    /// never loses bits.
    pub fn from_xor(xor: u64) -> Self {
        debug_assert!(xor != 0);
        let leading_zeros = xor.leading_zeros().min(MAX_DESCRIBED_LEADING_ZEROS);
        let trailing_zeros = xor.trailing_zeros();
        MeaningfulWindow {
            leading_zeros,
            meaningful_bits: 64 - leading_zeros - trailing_zeros,
            trailing_zeros,
        }
    }

    /// Rebuilds a window from its decoded descriptor fields.
    pub fn from_descriptor(leading_zeros: u32, meaningful_bits: u32) -> CodecResult<Self> {
        if leading_zeros + meaningful_bits > 64 {
            return Err(CodecError::Format(format!(
                "window leading_zeros={leading_zeros} + meaningful_bits={meaningful_bits} exceeds 64"
            )));
        }
        Ok(MeaningfulWindow {
            leading_zeros,
            meaningful_bits,
            trailing_zeros: 64 - leading_zeros - meaningful_bits,
        })
    }

    /// Whether `other`'s span fits entirely inside this window.
    #[inline]
    pub fn contains(&self, other: &MeaningfulWindow) -> bool {
        other.leading_zeros >= self.leading_zeros && other.trailing_zeros >= self.trailing_zeros
    }

    /// Extracts this window's payload bits from an XOR value.
    #[inline]
    pub fn extract(&self, xor: u64) -> u64 {
        (xor >> self.trailing_zeros) & bitmask(self.meaningful_bits)
    }

    /// Places payload bits back into this window's span.
    #[inline]
    pub fn place(&self, payload: u64) -> u64 {
        payload << self.trailing_zeros
    }
}

/// Writes one XOR record: the identical/reuse/new-window control bits, the
/// window descriptor when a new window is declared, and the payload.
/// Shared by the plain and ELF-composed encoders.
pub(crate) fn write_xor_record(
    out: &mut BitBuffer,
    xor: u64,
    window: &mut Option<MeaningfulWindow>,
) {
    if xor == 0 {
        out.write_bit(false);
        return;
    }
    out.write_bit(true);

    let new_window = MeaningfulWindow::from_xor(xor);
    match *window {
        Some(w) if w.contains(&new_window) => {
            out.write_bit(false);
            out.write_bits(w.extract(xor), w.meaningful_bits);
        }
        _ => {
            out.write_bit(true);
            out.write_bits(new_window.leading_zeros as u64, 5);
            out.write_bits((new_window.meaningful_bits - 1) as u64, 6);
            out.write_bits(new_window.extract(xor), new_window.meaningful_bits);
            *window = Some(new_window);
        }
    }
}

/// Reads one XOR record written by [`write_xor_record`].
pub(crate) fn read_xor_record(
    reader: &mut BitReader<'_>,
    window: &mut Option<MeaningfulWindow>,
) -> CodecResult<u64> {
    let changed = reader
        .read_bit()
        .ok_or_else(|| CodecError::unexpected_end("control bit"))?;
    if !changed {
        return Ok(0);
    }

    let new_window = reader
        .read_bit()
        .ok_or_else(|| CodecError::unexpected_end("window control bit"))?;

    let w = if new_window {
        let leading_zeros = reader
            .read_bits(5)
            .ok_or_else(|| CodecError::unexpected_end("window descriptor"))? as u32;
        let meaningful_bits = reader
            .read_bits(6)
            .ok_or_else(|| CodecError::unexpected_end("window descriptor"))? as u32
            + 1;
        let w = MeaningfulWindow::from_descriptor(leading_zeros, meaningful_bits)?;
        *window = Some(w);
        w
    } else {
        window.ok_or_else(|| {
            CodecError::Format("window reuse before any window was declared".into())
        })?
    };

    let payload = reader
        .read_bits(w.meaningful_bits)
        .ok_or_else(|| CodecError::unexpected_end("window payload"))?;
    Ok(w.place(payload))
}

/// The gorilla codec over raw signal values.
pub struct Gorilla;

impl Codec for Gorilla {
    fn name(&self) -> &'static str {
        "gorilla"
    }

    fn encode(&self, input: &Path) -> CodecResult<BitBuffer> {
        let values = read_values(input)?;
        encode_values(&values)
    }

    fn decode(&self, reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
        decode_reader(reader)
    }
}
