use crate::core::{BitReader, CodecError, CodecResult};

use super::{read_xor_record, MeaningfulWindow};

/// Decodes a gorilla stream back into the original signal.
pub fn decode_reader(reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
    let n = reader
        .read_bits(32)
        .ok_or_else(|| CodecError::unexpected_end("sample count"))? as usize;
    if n == 0 {
        return Err(CodecError::Format("stream declares zero samples".into()));
    }
    let first = reader
        .read_bits(64)
        .ok_or_else(|| CodecError::unexpected_end("first value"))?;

    // Every record costs at least one bit, which bounds any declared count.
    let mut values = Vec::with_capacity(n.min(reader.remaining() + 1));
    values.push(f64::from_bits(first));

    let mut prev_bits = first;
    let mut window: Option<MeaningfulWindow> = None;

    while values.len() < n {
        let xor = read_xor_record(reader, &mut window)?;
        prev_bits ^= xor;
        values.push(f64::from_bits(prev_bits));
    }

    Ok(values)
}
