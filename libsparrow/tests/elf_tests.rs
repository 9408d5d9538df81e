//! Round-trip tests for the ELF-composed codecs.
//!
//! The contract: unerased values survive bit-exactly, erased values decode
//! back to the literal's declared decimal precision, which for these inputs
//! means the identical parsed double.

use libsparrow::core::{BitReader, Literal};
use libsparrow::elf::{decimal_places, gorilla, significant_digits, sparrow};

fn literals(texts: &[&str]) -> Vec<Literal> {
    texts
        .iter()
        .map(|t| Literal {
            text: t.to_string(),
            value: t.parse().unwrap(),
        })
        .collect()
}

fn sparrow_roundtrip(lits: &[Literal]) -> Vec<f64> {
    let bytes = sparrow::encode_literals(lits).unwrap().into_bytes();
    let mut reader = BitReader::from_bytes(&bytes);
    sparrow::decode_reader(&mut reader).unwrap()
}

fn gorilla_roundtrip(lits: &[Literal]) -> Vec<f64> {
    let bytes = gorilla::encode_literals(lits).unwrap().into_bytes();
    let mut reader = BitReader::from_bytes(&bytes);
    gorilla::decode_reader(&mut reader).unwrap()
}

fn assert_within_declared_precision(lits: &[Literal], decoded: &[f64]) {
    assert_eq!(lits.len(), decoded.len());
    for (lit, d) in lits.iter().zip(decoded.iter()) {
        let tolerance = 10f64.powi(-(decimal_places(&lit.text) as i32));
        let error = (lit.value - d).abs();
        assert!(
            error <= tolerance,
            "literal {:?} decoded to {d}, error {error:e} > {tolerance:e}",
            lit.text
        );
    }
}

const MIXED: [&str; 12] = [
    "3.14", "0.0456", "271.8", "1.25", "100.0", "0.001", "42", "-12.5", "0", "3.140", "0.01",
    "-271.8",
];

#[test]
fn test_sparrow_elf_roundtrip_mixed() {
    let lits = literals(&MIXED);
    let decoded = sparrow_roundtrip(&lits);
    assert_within_declared_precision(&lits, &decoded);
    // These literals all reconstruct to the very same double.
    for (lit, d) in lits.iter().zip(decoded.iter()) {
        assert_eq!(lit.value, *d, "literal {:?}", lit.text);
    }
}

#[test]
fn test_gorilla_elf_roundtrip_mixed() {
    let lits = literals(&MIXED);
    let decoded = gorilla_roundtrip(&lits);
    assert_within_declared_precision(&lits, &decoded);
    for (lit, d) in lits.iter().zip(decoded.iter()) {
        assert_eq!(lit.value, *d, "literal {:?}", lit.text);
    }
}

#[test]
fn test_sparrow_elf_zero_signal() {
    // Scenario: [0.0, 0.0]. Both values store only the zero marker; the
    // stream is the empty-model header, the window, the count and two bits.
    let lits = literals(&["0.0", "0.0"]);
    let encoded = sparrow::encode_literals(&lits).unwrap();
    assert_eq!(encoded.len_bits(), 16 + 16 + 64 + 2);

    let bytes = encoded.into_bytes();
    let mut reader = BitReader::from_bytes(&bytes);
    assert_eq!(sparrow::decode_reader(&mut reader).unwrap(), vec![0.0, 0.0]);
}

#[test]
fn test_gorilla_elf_beta_star_field() {
    // Scenario: "3.140" has alpha = 2 and beta* = 3; the first record's
    // erased flag is set and the 4-bit field holds 3.
    let lits = literals(&["3.140"]);
    assert_eq!(decimal_places("3.140"), 2);
    assert_eq!(significant_digits("3.140"), 3);

    let bytes = gorilla::encode_literals(&lits).unwrap().into_bytes();
    let mut reader = BitReader::from_bytes(&bytes);
    assert_eq!(reader.read_bits(32), Some(1)); // N
    assert_eq!(reader.read_bit(), Some(true)); // erased
    assert_eq!(reader.read_bits(4), Some(3)); // beta*

    let mut reader = BitReader::from_bytes(&bytes);
    let decoded = gorilla::decode_reader(&mut reader).unwrap();
    assert_eq!(decoded, vec![3.14]);
}

#[test]
fn test_gorilla_elf_power_of_ten() {
    // beta* = 0 flags the power of ten; reconstruction is exact.
    let lits = literals(&["0.01", "0.01", "0.001"]);
    let bytes = gorilla::encode_literals(&lits).unwrap().into_bytes();

    let mut reader = BitReader::from_bytes(&bytes);
    assert_eq!(reader.read_bits(32), Some(3));
    assert_eq!(reader.read_bit(), Some(true));
    assert_eq!(reader.read_bits(4), Some(0)); // power-of-ten marker

    let mut reader = BitReader::from_bytes(&bytes);
    assert_eq!(
        gorilla::decode_reader(&mut reader).unwrap(),
        vec![0.01, 0.01, 0.001]
    );
}

#[test]
fn test_sparrow_elf_periodic_signal_with_literals() {
    // A sine sampled to 4 decimal places, as it would arrive in a text
    // file. Every value reconstructs to the same printed precision.
    let texts: Vec<String> = (0..400)
        .map(|i| {
            let t = i as f64 / 400.0;
            let v = 25.0 * (2.0 * std::f64::consts::PI * 3.0 * t + 0.25).cos();
            format!("{v:.4}")
        })
        .collect();
    let lits: Vec<Literal> = texts
        .iter()
        .map(|t| Literal {
            text: t.clone(),
            value: t.parse().unwrap(),
        })
        .collect();

    let decoded = sparrow_roundtrip(&lits);
    assert_within_declared_precision(&lits, &decoded);
}

#[test]
fn test_gorilla_elf_periodic_signal_with_literals() {
    let texts: Vec<String> = (0..400)
        .map(|i| {
            let t = i as f64 / 400.0;
            let v = 25.0 * (2.0 * std::f64::consts::PI * 3.0 * t + 0.25).cos();
            format!("{v:.4}")
        })
        .collect();
    let lits: Vec<Literal> = texts
        .iter()
        .map(|t| Literal {
            text: t.clone(),
            value: t.parse().unwrap(),
        })
        .collect();

    let decoded = gorilla_roundtrip(&lits);
    assert_within_declared_precision(&lits, &decoded);
}

#[test]
fn test_erasure_actually_shrinks_the_stream() {
    // 6 significant digits against full 17-digit doubles: the erased
    // stream must be smaller than the unerased gorilla stream.
    let texts: Vec<String> = (0..500)
        .map(|i| format!("{:.3}", 900.0 + (i as f64 * 0.37).sin() * 50.0))
        .collect();
    let lits: Vec<Literal> = texts
        .iter()
        .map(|t| Literal {
            text: t.clone(),
            value: t.parse().unwrap(),
        })
        .collect();
    let values: Vec<f64> = lits.iter().map(|l| l.value).collect();

    let plain = libsparrow::gorilla::encode_values(&values).unwrap().len_bits();
    let erased = gorilla::encode_literals(&lits).unwrap().len_bits();
    assert!(
        erased < plain,
        "erased stream ({erased} bits) not smaller than plain ({plain} bits)"
    );
}

#[test]
fn test_elf_empty_signal_is_an_error() {
    assert!(sparrow::encode_literals(&[]).is_err());
    assert!(gorilla::encode_literals(&[]).is_err());
}
