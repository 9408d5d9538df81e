//! The uniform encode/decode contract and the algorithm factory.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::baseline::{Deflate, Lz4};
use crate::core::{BitBuffer, BitReader, CodecResult};
use crate::elf::{GorillaElf, SparrowElf};
use crate::gorilla::Gorilla;
use crate::sparrow::Sparrow;

/// A compression algorithm over a text signal.
///
/// `decode(encode(x))` reproduces `x` exactly for the lossless algorithms
/// and within the ELF-declared number of significant decimal digits for the
/// ELF-composed variants. Encoding is deterministic for identical input. A
/// stream that runs out of bits mid-record is a hard failure, never silently
/// patched.
pub trait Codec {
    /// Short lowercase name, matching [`Algorithm`]'s string form.
    fn name(&self) -> &'static str;

    /// Reads the signal file and produces the encoded bit sequence.
    fn encode(&self, input: &Path) -> CodecResult<BitBuffer>;

    /// Decodes an ordered double sequence from stored bytes.
    fn decode(&self, reader: &mut BitReader<'_>) -> CodecResult<Vec<f64>>;

    /// Whether decode must reproduce the input bit-exactly.
    fn is_lossless(&self) -> bool {
        true
    }
}

/// Selector for the six concrete algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Sparrow,
    Gorilla,
    SparrowElf,
    GorillaElf,
    Deflate,
    Lz4,
}

impl Algorithm {
    /// All algorithms, in comparison-report order.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Sparrow,
        Algorithm::Gorilla,
        Algorithm::SparrowElf,
        Algorithm::GorillaElf,
        Algorithm::Deflate,
        Algorithm::Lz4,
    ];

    /// Builds the codec for this algorithm.
    pub fn create(self) -> Box<dyn Codec> {
        match self {
            Algorithm::Sparrow => Box::new(Sparrow),
            Algorithm::Gorilla => Box::new(Gorilla),
            Algorithm::SparrowElf => Box::new(SparrowElf),
            Algorithm::GorillaElf => Box::new(GorillaElf),
            Algorithm::Deflate => Box::new(Deflate),
            Algorithm::Lz4 => Box::new(Lz4),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sparrow => "sparrow",
            Algorithm::Gorilla => "gorilla",
            Algorithm::SparrowElf => "sparrow-elf",
            Algorithm::GorillaElf => "gorilla-elf",
            Algorithm::Deflate => "deflate",
            Algorithm::Lz4 => "lz4",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sparrow" => Ok(Algorithm::Sparrow),
            "gorilla" => Ok(Algorithm::Gorilla),
            "sparrow-elf" | "sparrowelf" => Ok(Algorithm::SparrowElf),
            "gorilla-elf" | "gorillaelf" => Ok(Algorithm::GorillaElf),
            "deflate" | "zlib" => Ok(Algorithm::Deflate),
            "lz4" => Ok(Algorithm::Lz4),
            other => Err(format!(
                "unknown algorithm {:?} (expected one of: sparrow, gorilla, sparrow-elf, gorilla-elf, deflate, lz4)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_string_roundtrip() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.as_str().parse::<Algorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn test_factory_names_match() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.create().name(), alg.as_str());
        }
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!("brotli".parse::<Algorithm>().is_err());
    }
}
