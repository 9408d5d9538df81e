//! Error type shared by every codec.

use std::fmt;
use std::io;

/// Failure modes of encode/decode calls.
#[derive(Debug)]
pub enum CodecError {
    /// Input file missing or unreadable.
    Io(io::Error),
    /// Malformed numeric literal where the path cannot skip it.
    Parse(String),
    /// Inconsistent stream field, or a stream that ran out of bits in the
    /// middle of a declared field.
    Format(String),
    /// Decoded output diverges from the original beyond the declared
    /// tolerance, or has the wrong length.
    Reconstruction(String),
}

impl CodecError {
    /// Convenience constructor for truncated-stream failures.
    pub fn unexpected_end(what: &str) -> Self {
        CodecError::Format(format!("stream ended inside {what}"))
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Io(e) => write!(f, "i/o error: {e}"),
            CodecError::Parse(msg) => write!(f, "parse error: {msg}"),
            CodecError::Format(msg) => write!(f, "malformed stream: {msg}"),
            CodecError::Reconstruction(msg) => write!(f, "reconstruction mismatch: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        CodecError::Io(e)
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
