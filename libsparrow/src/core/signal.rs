//! Text signal I/O: one decimal value per line.
//!
//! Lines are trimmed, a comma decimal separator is normalized to a period,
//! and blank lines are dropped. The plain reader skips unparsable lines with
//! a warning; the literal-preserving reader used by the ELF codecs treats
//! them as fatal, because erasure metadata is derived from the digit string
//! itself.

use std::fs;
use std::path::Path;

use super::error::{CodecError, CodecResult};

/// A source value together with the literal it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// Normalized digit string (trimmed, `,` replaced by `.`).
    pub text: String,
    /// Parsed value.
    pub value: f64,
}

/// Normalizes one line: strip whitespace, comma decimal separator to period.
fn normalize(line: &str) -> String {
    line.trim().replace(',', ".")
}

/// Reads a signal as doubles. Unparsable lines are logged and skipped.
pub fn read_values(path: &Path) -> CodecResult<Vec<f64>> {
    let contents = fs::read_to_string(path)?;
    let mut values = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let cleaned = normalize(line);
        if cleaned.is_empty() {
            continue;
        }
        match cleaned.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) => {
                eprintln!(
                    "warning: could not parse line {}: {:?}",
                    idx + 1,
                    line.trim()
                );
            }
        }
    }

    if values.is_empty() {
        return Err(CodecError::Parse(format!(
            "no data read from {}",
            path.display()
        )));
    }
    Ok(values)
}

/// Reads a signal keeping the original decimal text of every line.
/// Any unparsable line is fatal here.
pub fn read_literals(path: &Path) -> CodecResult<Vec<Literal>> {
    let contents = fs::read_to_string(path)?;
    let mut literals = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let cleaned = normalize(line);
        if cleaned.is_empty() {
            continue;
        }
        let value = cleaned.parse::<f64>().map_err(|_| {
            CodecError::Parse(format!("cannot convert line {} to double: {:?}", idx + 1, line))
        })?;
        literals.push(Literal {
            text: cleaned,
            value,
        });
    }

    if literals.is_empty() {
        return Err(CodecError::Parse(format!(
            "no data read from {}",
            path.display()
        )));
    }
    Ok(literals)
}

/// Writes a signal back out, one value per line.
pub fn write_values(path: &Path, values: &[f64]) -> CodecResult<()> {
    let mut out = String::with_capacity(values.len() * 8);
    for v in values {
        out.push_str(&format!("{v}\n"));
    }
    fs::write(path, out)?;
    Ok(())
}
