//! Generic byte-oriented compressors used as comparison baselines.
//!
//! Both operate on the raw little-endian image of the f64 array. The
//! stream is a 64-bit sample count followed by the byte-aligned compressed
//! payload; they exist to give the bit-level codecs something to beat.

use std::io::Write;
use std::path::Path;

use flate2::write::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;

use crate::codec::Codec;
use crate::core::{read_values, BitBuffer, BitReader, CodecError, CodecResult};

fn values_to_bytes(values: &[f64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * 8);
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

fn bytes_to_values(bytes: &[u8], n: usize) -> CodecResult<Vec<f64>> {
    if bytes.len() != n * 8 {
        return Err(CodecError::Format(format!(
            "decompressed payload is {} bytes, expected {} for {} samples",
            bytes.len(),
            n * 8,
            n
        )));
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| f64::from_le_bytes(chunk.try_into().unwrap()))
        .collect())
}

fn wrap_payload(n: usize, payload: &[u8]) -> BitBuffer {
    let mut out = BitBuffer::with_capacity(payload.len() + 8);
    out.write_bits(n as u64, 64);
    for &byte in payload {
        out.write_bits(byte as u64, 8);
    }
    out
}

fn unwrap_payload<'a>(reader: &mut BitReader<'a>) -> CodecResult<(usize, &'a [u8])> {
    let n = reader
        .read_bits(64)
        .ok_or_else(|| CodecError::unexpected_end("sample count"))? as usize;
    let byte_count = reader.remaining() / 8;
    let payload = reader
        .read_aligned_bytes(byte_count)
        .ok_or_else(|| CodecError::Format("compressed payload is not byte-aligned".into()))?;
    Ok((n, payload))
}

/// zlib over the raw double array.
pub struct Deflate;

impl Codec for Deflate {
    fn name(&self) -> &'static str {
        "deflate"
    }

    fn encode(&self, input: &Path) -> CodecResult<BitBuffer> {
        let values = read_values(input)?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&values_to_bytes(&values))?;
        let compressed = encoder.finish()?;
        Ok(wrap_payload(values.len(), &compressed))
    }

    fn decode(&self, reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
        let (n, payload) = unwrap_payload(reader)?;
        let mut decoder = ZlibDecoder::new(Vec::new());
        decoder
            .write_all(payload)
            .map_err(|e| CodecError::Format(format!("zlib decompression failed: {e}")))?;
        let bytes = decoder
            .finish()
            .map_err(|e| CodecError::Format(format!("zlib decompression failed: {e}")))?;
        bytes_to_values(&bytes, n)
    }
}

/// LZ4 over the raw double array.
pub struct Lz4;

impl Codec for Lz4 {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn encode(&self, input: &Path) -> CodecResult<BitBuffer> {
        let values = read_values(input)?;
        let compressed = lz4_flex::compress_prepend_size(&values_to_bytes(&values));
        Ok(wrap_payload(values.len(), &compressed))
    }

    fn decode(&self, reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
        let (n, payload) = unwrap_payload(reader)?;
        let bytes = lz4_flex::decompress_size_prepended(payload)
            .map_err(|e| CodecError::Format(format!("lz4 decompression failed: {e}")))?;
        bytes_to_values(&bytes, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_byte_roundtrip() {
        let values = vec![1.5, -2.25, 0.0, f64::MIN_POSITIVE];
        let bytes = values_to_bytes(&values);
        assert_eq!(bytes_to_values(&bytes, 4).unwrap(), values);
        assert!(bytes_to_values(&bytes, 3).is_err());
    }
}
