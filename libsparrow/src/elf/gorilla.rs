//! Gorilla with per-value ELF erasure.
//!
//! Each gorilla record is prefixed with an erased flag (and a 4-bit beta*
//! when set). Erased values have their low mantissa bits zeroed before the
//! XOR chain, so the chain runs over erased bit patterns end to end; the
//! original precision is restored per value after the XOR undo.

use std::path::Path;

use crate::codec::Codec;
use crate::core::{read_literals, BitBuffer, BitReader, CodecError, CodecResult, Literal};
use crate::gorilla::{read_xor_record, write_xor_record, MeaningfulWindow};

use super::{analyze, erase_beyond, restore, should_erase, BETA_STAR_BITS};

/// The gorilla + ELF codec.
pub struct GorillaElf;

impl Codec for GorillaElf {
    fn name(&self) -> &'static str {
        "gorilla-elf"
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

/// Erases a literal's value when the erasure pays for itself; returns the
/// stored bit pattern and the beta* to record, if any.
fn erased_bits(literal: &Literal) -> (u64, Option<u32>) {
    let info = analyze(literal);
    let bits = literal.value.to_bits();
    if should_erase(bits, info.position, info.beta_star) {
        (erase_beyond(bits, info.position), Some(info.beta_star))
    } else {
        (bits, None)
    }
}

/// Encodes a signal with the gorilla-elf codec.
pub fn encode_literals(literals: &[Literal]) -> CodecResult<BitBuffer> {
    let n = literals.len();
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

    let (first_bits, first_beta) = erased_bits(&literals[0]);
    out.write_bit(first_beta.is_some());
    if let Some(beta) = first_beta {
        out.write_bits(beta as u64, BETA_STAR_BITS);
    }
    out.write_bits(first_bits, 64);

    let mut prev_bits = first_bits;
    let mut window: Option<MeaningfulWindow> = None;

    for literal in &literals[1..] {
        let (curr_bits, beta) = erased_bits(literal);
        out.write_bit(beta.is_some());
        if let Some(beta) = beta {
            out.write_bits(beta as u64, BETA_STAR_BITS);
        }
        write_xor_record(&mut out, prev_bits ^ curr_bits, &mut window);
        prev_bits = curr_bits;
    }

    Ok(out)
}

/// Decodes a gorilla-elf stream back into the signal, exact for unerased
/// values and correct to beta* significant digits for erased ones.
pub fn decode_reader(reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>> {
    let n = reader
        .read_bits(32)
        .ok_or_else(|| CodecError::unexpected_end("sample count"))? as usize;
    if n == 0 {
        return Err(CodecError::Format("stream declares zero samples".into()));
    }

    let read_elf_flag = |reader: &mut BitReader<'_>| -> CodecResult<Option<u32>> {
        let erased = reader
            .read_bit()
            .ok_or_else(|| CodecError::unexpected_end("erased flag"))?;
        if !erased {
            return Ok(None);
        }
        let beta = reader
            .read_bits(BETA_STAR_BITS)
            .ok_or_else(|| CodecError::unexpected_end("beta* field"))?;
        Ok(Some(beta as u32))
    };

    let first_beta = read_elf_flag(reader)?;
    let first_bits = reader
        .read_bits(64)
        .ok_or_else(|| CodecError::unexpected_end("first value"))?;

    // Every record costs at least one bit, which bounds any declared count.
    let mut values = Vec::with_capacity(n.min(reader.remaining() + 1));
    values.push(match first_beta {
        Some(beta) => restore(f64::from_bits(first_bits), beta),
        None => f64::from_bits(first_bits),
    });

    // The chain state stays on the erased patterns, never the restored ones.
    let mut prev_bits = first_bits;
    let mut window: Option<MeaningfulWindow> = None;

    while values.len() < n {
        let beta = read_elf_flag(reader)?;
        let xor = read_xor_record(reader, &mut window)?;
        prev_bits ^= xor;

        values.push(match beta {
            Some(beta) => restore(f64::from_bits(prev_bits), beta),
            None => f64::from_bits(prev_bits),
        });
    }

    Ok(values)
}
