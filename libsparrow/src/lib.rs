//! # libsparrow
//!
//! Lossless and precision-bounded-lossy codecs for ordered sequences of
//! f64 samples, built for comparing compression strategies on real-world
//! time-series.
//!
//! ## The codec family
//!
//! - **Sparrow**: fits a compact sinusoidal model to the signal via a real
//!   DFT and greedy cost/benefit selection, then encodes the model/signal
//!   XOR residuals with a single globally optimal bit window.
//! - **Gorilla**: the value track of Facebook's Gorilla scheme (VLDB 2015);
//!   consecutive values are XORed and only the meaningful bit window is
//!   stored, reusing the previous window while it still fits.
//! - **SparrowElf / GorillaElf**: either codec composed with ELF-style
//!   mantissa erasure, which zeroes trailing mantissa bits that fall below
//!   the decimal precision of the source literal and restores them on
//!   decode by rounding back to the declared decimal places.
//! - **Deflate / Lz4**: byte-oriented reference baselines over the raw
//!   double array.
//!
//! All six implement the [`Codec`] trait and are built through
//! [`Algorithm::create`]. Lossless codecs round-trip bit-exactly; the
//! ELF-composed ones round-trip to at least `beta*` significant decimal
//! digits per value.
//!
//! ## Example
//!
//! ```no_run
//! use libsparrow::{Algorithm, BitReader};
//!
//! let codec = Algorithm::Gorilla.create();
//! let encoded = codec.encode("signal.txt".as_ref()).unwrap();
//! let bytes = encoded.into_bytes();
//!
//! let mut reader = BitReader::from_bytes(&bytes);
//! let signal = codec.decode(&mut reader).unwrap();
//! println!("decoded {} samples", signal.len());
//! ```

pub mod baseline;
pub mod codec;
pub mod core;
pub mod elf;
pub mod gorilla;
pub mod sparrow;
pub mod spectral;

pub use codec::{Algorithm, Codec};
pub use core::{BitBuffer, BitReader, CodecError, CodecResult, Literal};
pub use spectral::{FrequencyComponent, SpectralModel};
