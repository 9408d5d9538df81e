use crate::core::{BitBuffer, CodecError, CodecResult};

use super::{write_xor_record, MeaningfulWindow};

/// Encodes a signal with the gorilla codec.
///
/// Header: 32-bit sample count, then the first value raw. Every following
/// value is a 1-bit "identical" record, a 2-bit "reuse window" record with
/// the payload, or a 2-bit "new window" record with an 11-bit descriptor
/// (5-bit leading zeros, 6-bit meaningful length minus one) and the payload.
pub fn encode_values(values: &[f64]) -> CodecResult<BitBuffer> {
    let n = values.len();
    if n == 0 {
        return Err(CodecError::Parse("empty signal".into()));
    }
    if n > u32::MAX as usize {
        return Err(CodecError::Format(format!(
            "sample count {n} exceeds the 32-bit count field"
        )));
    }

    let mut out = BitBuffer::with_capacity(n * 4);
    out.write_bits(n as u64, 32);
    out.write_bits(values[0].to_bits(), 64);

    let mut prev_bits = values[0].to_bits();
    let mut window: Option<MeaningfulWindow> = None;

    for &value in &values[1..] {
        let curr_bits = value.to_bits();
        write_xor_record(&mut out, prev_bits ^ curr_bits, &mut window);
        prev_bits = curr_bits;
    }

    Ok(out)
}
