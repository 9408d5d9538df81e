use crate::core::{BitReader, CodecError, CodecResult};
use crate::spectral::{FrequencyComponent, SpectralModel};

use super::window_prefix_len;

/// Reads the sparrow stream header: the spectral model and the window
/// length.
pub fn read_header(reader: &mut BitReader<'_>) -> CodecResult<(SpectralModel, u32)> {
    let count = reader
        .read_bits(16)
        .ok_or_else(|| CodecError::unexpected_end("component count"))?;

    let mut components = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let frequency = reader
            .read_bits(64)
            .ok_or_else(|| CodecError::unexpected_end("component frequency"))?;
        let amplitude = reader
            .read_bits(64)
            .ok_or_else(|| CodecError::unexpected_end("component amplitude"))?;
        let phase = reader
            .read_bits(64)
            .ok_or_else(|| CodecError::unexpected_end("component phase"))?;
        components.push(FrequencyComponent {
            frequency: f64::from_bits(frequency),
            amplitude: f64::from_bits(amplitude),
            phase: f64::from_bits(phase),
        });
    }

    let wl = reader
        .read_bits(16)
        .ok_or_else(|| CodecError::unexpected_end("window length"))? as u32;
    if !(1..=64).contains(&wl) {
        return Err(CodecError::Format(format!(
            "window length {wl} outside [1, 64]"
        )));
    }

    Ok((SpectralModel { components }, wl))
}

/// Decodes a sparrow stream back into the original signal.
///
/// The stream carries no sample count; records are read until only the
/// byte-padding tail (fewer than 8 zero bits) remains. A record that runs
/// out of bits mid-field is a format error.
pub fn decode_reader(reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
    let (model, wl) = read_header(reader)?;
    let prefix_len = window_prefix_len(wl);

    let mut residuals: Vec<u64> = Vec::new();
    loop {
        if reader.is_exhausted() || (reader.remaining() <= 7 && reader.rest_is_zero_padding()) {
            break;
        }

        let control = reader
            .read_bit()
            .ok_or_else(|| CodecError::unexpected_end("control bit"))?;

        let residual = if control {
            // leading zeros >= w_l: fixed-width significand
            reader
                .read_bits(64 - wl)
                .ok_or_else(|| CodecError::unexpected_end("fixed-window significand"))?
        } else {
            let leading_zeros = reader
                .read_bits(prefix_len)
                .ok_or_else(|| CodecError::unexpected_end("leading-zero prefix"))?
                as u32;
            reader
                .read_bits(64 - leading_zeros)
                .ok_or_else(|| CodecError::unexpected_end("significand"))?
        };
        residuals.push(residual);
    }

    // Only now is N known; rebuild the model over exactly these samples.
    let n = residuals.len();
    let approx = model.reconstruct(n);

    Ok(approx
        .iter()
        .zip(residuals.iter())
        .map(|(a, &r)| f64::from_bits(a.to_bits() ^ r))
        .collect())
}
