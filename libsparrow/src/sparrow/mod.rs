//! The sparrow window codec.
//!
//! Residuals are XORs between the spectral model's bit pattern and the true
//! signal's. A single window length `w_l` is chosen once per stream: any
//! residual whose leading-zero count reaches `w_l` is stored as a
//! fixed-width `64 - w_l` bit significand behind a 1 control bit; everything
//! else stores its leading-zero count in a short prefix and the full
//! significand. The window is found by exact search over all 64 candidates
//! against the stream's leading-zero histogram, so no other `w_l` can beat
//! it on the histogram-weighted average cost.

mod decoder;
mod encoder;

pub use decoder::{decode_reader, read_header};
pub use encoder::encode_values;

use std::path::Path;

use crate::codec::Codec;
use crate::core::{read_values, BitBuffer, BitReader, CodecResult};

/// Bits of the prefix that stores a leading-zero count below `w_l`.
#[inline]
pub fn window_prefix_len(wl: u32) -> u32 {
    // ceil(log2(wl)), 0 for wl <= 1
    if wl <= 1 {
        0
    } else {
        32 - (wl - 1).leading_zeros()
    }
}

/// Histogram of leading-zero counts; bucket 64 holds all-zero residuals.
pub fn leading_zero_histogram(residuals: &[u64]) -> [u64; 65] {
    let mut histogram = [0u64; 65];
    for &r in residuals {
        histogram[r.leading_zeros() as usize] += 1;
    }
    histogram
}

/// Total encoded bits for the records of a stream with this leading-zero
/// histogram under window length `wl`.
pub fn window_cost(histogram: &[u64; 65], wl: u32) -> u64 {
    let prefix_len = window_prefix_len(wl) as u64;
    let mut total_bits = 0u64;
    for (lz, &count) in histogram.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let lz = lz as u64;
        if lz >= wl as u64 {
            total_bits += count * (1 + 64 - wl as u64);
        } else {
            total_bits += count * (1 + prefix_len + 64 - lz);
        }
    }
    total_bits
}

/// Exact O(65x65) search for the window minimizing the total record cost.
pub fn select_window(histogram: &[u64; 65]) -> u32 {
    let mut best_wl = 1;
    let mut best_cost = u64::MAX;
    for wl in 1..=64 {
        let cost = window_cost(histogram, wl);
        if cost < best_cost {
            best_cost = cost;
            best_wl = wl;
        }
    }
    best_wl
}

/// The sparrow codec: spectral model + globally optimal residual window.
pub struct Sparrow;

impl Codec for Sparrow {
    fn name(&self) -> &'static str {
        "sparrow"
    }

    fn encode(&self, input: &Path) -> CodecResult<BitBuffer> {
        let values = read_values(input)?;
        encode_values(&values)
    }

    fn decode(&self, reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
        decode_reader(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_len() {
        assert_eq!(window_prefix_len(1), 0);
        assert_eq!(window_prefix_len(2), 1);
        assert_eq!(window_prefix_len(3), 2);
        assert_eq!(window_prefix_len(4), 2);
        assert_eq!(window_prefix_len(5), 3);
        assert_eq!(window_prefix_len(32), 5);
        assert_eq!(window_prefix_len(33), 6);
        assert_eq!(window_prefix_len(64), 6);
    }

    #[test]
    fn test_all_zero_residuals_pick_widest_window() {
        let histogram = leading_zero_histogram(&[0u64; 10]);
        assert_eq!(histogram[64], 10);
        // Every residual is empty; w_l = 64 stores each in a single bit.
        assert_eq!(select_window(&histogram), 64);
        assert_eq!(window_cost(&histogram, 64), 10);
    }

    #[test]
    fn test_selected_window_is_optimal() {
        let residuals: Vec<u64> = (0..200)
            .map(|i| if i % 3 == 0 { 0xFFFF } else { 0xFF_FFFF })
            .collect();
        let histogram = leading_zero_histogram(&residuals);
        let best = select_window(&histogram);
        let best_cost = window_cost(&histogram, best);
        for wl in 1..=64 {
            assert!(
                window_cost(&histogram, wl) >= best_cost,
                "wl={wl} beats selected {best}"
            );
        }
    }
}
