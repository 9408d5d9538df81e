//! End-to-end tests of the comparison harness.

use std::fs;
use std::path::PathBuf;

use libsparrow::Algorithm;
use resparrow::{compare, decode_bytes, encode_file, signal};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("resparrow-{}-{}", std::process::id(), name))
}

fn write_signal(name: &str, values: &[f64], decimals: usize) -> PathBuf {
    let path = temp_path(name);
    let text: String = values
        .iter()
        .map(|v| format!("{v:.decimals$}\n"))
        .collect();
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_compare_runs_all_codecs() {
    let values = signal::clean_signal(400, 800.0);
    let path = write_signal("all.txt", &values, 4);

    let report = compare(&path, &Algorithm::ALL).unwrap();
    assert_eq!(report.samples, 400);
    assert_eq!(report.original_bits, 400 * 64);
    assert_eq!(report.codecs.len(), 6);

    for codec in &report.codecs {
        assert!(
            codec.encoded_bits > 0 && codec.encoded_bits <= codec.encoded_bytes * 8,
            "{}: inconsistent sizes",
            codec.algorithm
        );
        if codec.lossless {
            assert_eq!(codec.max_abs_error, 0.0, "{}", codec.algorithm);
        }
    }

    // A smooth periodic signal printed to 4 decimals: the bit-level codecs
    // must beat raw storage.
    let sparrow = report
        .codecs
        .iter()
        .find(|c| c.algorithm == "sparrow")
        .unwrap();
    assert!(sparrow.compression_ratio < 1.0);

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_compare_disturbed_signal_lossless_only() {
    let values = signal::disturbed_signal(300, 500.0, 2.0, 7).unwrap();
    let path = write_signal("noisy.txt", &values, 6);

    let report = compare(
        &path,
        &[Algorithm::Sparrow, Algorithm::Gorilla, Algorithm::Deflate],
    )
    .unwrap();
    for codec in &report.codecs {
        assert_eq!(codec.max_abs_error, 0.0, "{}", codec.algorithm);
    }

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_encode_decode_file_roundtrip() {
    let values = signal::clean_signal(250, 120.0);
    let path = write_signal("roundtrip.txt", &values, 8);

    let expected: Vec<f64> = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|l| l.trim().parse().unwrap())
        .collect();

    for algorithm in [Algorithm::Sparrow, Algorithm::Gorilla, Algorithm::Lz4] {
        let (bytes, bits) = encode_file(algorithm, &path).unwrap();
        assert!(bits <= bytes.len() * 8);
        let decoded = decode_bytes(algorithm, &bytes).unwrap();
        assert_eq!(decoded, expected, "{algorithm}");
    }

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_compare_missing_file_fails() {
    let path = PathBuf::from("/no/such/signal.txt");
    assert!(compare(&path, &[Algorithm::Gorilla]).is_err());
}
