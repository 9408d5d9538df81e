use crate::core::{BitBuffer, CodecError, CodecResult};
use crate::spectral::SpectralModel;

use super::{leading_zero_histogram, select_window, window_prefix_len};

/// Encodes a signal with the sparrow codec.
///
/// Header: 16-bit component count; per component frequency, amplitude and
/// phase as raw doubles; 16-bit window length. Then one record per residual.
pub fn encode_values(values: &[f64]) -> CodecResult<BitBuffer> {
    let n = values.len();
    if n == 0 {
        return Err(CodecError::Parse("empty signal".into()));
    }

    let model = SpectralModel::select(values);
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

    for &r in &residuals {
        let leading_zeros = r.leading_zeros();
        if leading_zeros >= wl {
            // significand covers the fixed window span [w_l, 63]
            out.write_bit(true);
            out.write_bits(r, 64 - wl);
        } else {
            out.write_bit(false);
            out.write_bits(leading_zeros as u64, prefix_len);
            out.write_bits(r, 64 - leading_zeros);
        }
    }

    Ok(out)
}
