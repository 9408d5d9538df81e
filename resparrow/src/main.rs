use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use libsparrow::sparrow::read_header;
use libsparrow::{Algorithm, BitReader};
use resparrow::{compare, decode_bytes, encode_file, signal, ComparisonReport};

#[derive(Parser)]
#[command(name = "resparrow")]
#[command(version = "0.1.0")]
#[command(about = "Compress, decompress and compare f64 time-series codecs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a text signal (one value per line) to a compressed stream
    Encode {
        /// Input signal file
        input: PathBuf,
        /// Output stream file
        output: PathBuf,
        /// Algorithm: sparrow, gorilla, sparrow-elf, gorilla-elf, deflate, lz4
        #[arg(short, long, default_value = "sparrow")]
        algorithm: Algorithm,
    },
    /// Decode a compressed stream back to a text signal
    Decode {
        /// Input stream file
        input: PathBuf,
        /// Output signal file
        output: PathBuf,
        /// Algorithm the stream was encoded with
        #[arg(short, long, default_value = "sparrow")]
        algorithm: Algorithm,
    },
    /// Encode, decode and verify with several algorithms, reporting sizes
    /// and timings
    Compare {
        /// Input signal file
        input: PathBuf,
        /// Algorithms to compare (defaults to all six)
        #[arg(short, long)]
        algorithm: Vec<Algorithm>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a synthetic test signal
    Generate {
        /// Output signal file
        output: PathBuf,
        /// Number of samples
        #[arg(short, long, default_value = "10000")]
        points: usize,
        /// Peak amplitude of the clean signal
        #[arg(short, long, default_value = "1000")]
        amplitude: f64,
        /// Standard deviation of added Gaussian noise (0 = clean)
        #[arg(long, default_value = "0")]
        noise: f64,
        /// Seed for the noise generator
        #[arg(long, default_value = "1")]
        seed: u64,
    },
    /// Show header information of a compressed stream
    Info {
        /// Input stream file
        input: PathBuf,
        /// Algorithm the stream was encoded with
        #[arg(short, long, default_value = "sparrow")]
        algorithm: Algorithm,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            algorithm,
        } => encode(&input, &output, algorithm),
        Commands::Decode {
            input,
            output,
            algorithm,
        } => decode(&input, &output, algorithm),
        Commands::Compare {
            input,
            algorithm,
            json,
        } => run_compare(&input, &algorithm, json),
        Commands::Generate {
            output,
            points,
            amplitude,
            noise,
            seed,
        } => generate(&output, points, amplitude, noise, seed),
        Commands::Info { input, algorithm } => info(&input, algorithm),
    }
}

fn encode(input: &PathBuf, output: &PathBuf, algorithm: Algorithm) -> Result<()> {
    println!("Encoding {} with {}...", input.display(), algorithm);

    let samples = libsparrow::core::read_values(input)?.len();
    let (bytes, bits) = encode_file(algorithm, input)?;
    fs::write(output, &bytes).context("Failed to write output file")?;

    let original_bits = samples * 64;
    println!("Done!");
    println!("  Output:   {}", output.display());
    println!("  Samples:  {samples}");
    println!("  Encoded:  {bits} bits ({} bytes)", bytes.len());
    println!("  Original: {original_bits} bits");
    println!("  Ratio:    {:.4}", bits as f64 / original_bits as f64);
    Ok(())
}

fn decode(input: &PathBuf, output: &PathBuf, algorithm: Algorithm) -> Result<()> {
    println!("Decoding {} with {}...", input.display(), algorithm);

    let bytes = fs::read(input).context("Failed to read stream file")?;
    let values = decode_bytes(algorithm, &bytes)?;
    libsparrow::core::write_values(output, &values)?;

    println!("Done!");
    println!("  Output:  {}", output.display());
    println!("  Samples: {}", values.len());
    Ok(())
}

fn run_compare(input: &PathBuf, algorithms: &[Algorithm], json: bool) -> Result<()> {
    let algorithms: Vec<Algorithm> = if algorithms.is_empty() {
        Algorithm::ALL.to_vec()
    } else {
        algorithms.to_vec()
    };

    let report = compare(input, &algorithms)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ComparisonReport) {
    println!("Signal: {} ({} samples)", report.input, report.samples);
    println!("Raw size: {} bits", report.original_bits);
    println!();
    println!(
        "{:<12} {:>12} {:>8} {:>11} {:>11} {:>12}",
        "algorithm", "bits", "ratio", "encode ms", "decode ms", "max error"
    );
    println!("{}", "-".repeat(70));
    for codec in &report.codecs {
        println!(
            "{:<12} {:>12} {:>8.4} {:>11.2} {:>11.2} {:>12}",
            codec.algorithm,
            codec.encoded_bits,
            codec.compression_ratio,
            codec.encode_ms,
            codec.decode_ms,
            if codec.lossless {
                "exact".to_string()
            } else {
                format!("{:.2e}", codec.max_abs_error)
            }
        );
    }
}

fn generate(output: &PathBuf, points: usize, amplitude: f64, noise: f64, seed: u64) -> Result<()> {
    let values = if noise > 0.0 {
        println!("Generating {points} disturbed samples (sigma = {noise}, seed = {seed})...");
        signal::disturbed_signal(points, amplitude, noise, seed)?
    } else {
        println!("Generating {points} clean samples...");
        signal::clean_signal(points, amplitude)
    };

    libsparrow::core::write_values(output, &values)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn info(input: &PathBuf, algorithm: Algorithm) -> Result<()> {
    let bytes = fs::read(input).context("Failed to read stream file")?;
    let mut reader = BitReader::from_bytes(&bytes);

    println!("Stream: {} ({} bytes)", input.display(), bytes.len());
    println!("  Algorithm: {algorithm}");

    match algorithm {
        Algorithm::Sparrow | Algorithm::SparrowElf => {
            let (model, wl) = read_header(&mut reader)?;
            println!("  Components: {}", model.len());
            println!("  Window:     {wl}");
            for (i, c) in model.components.iter().take(10).enumerate() {
                println!(
                    "    [{i}] f = {:.3}  A = {:.6}  phi = {:.6}",
                    c.frequency, c.amplitude, c.phase
                );
            }
            if algorithm == Algorithm::SparrowElf {
                if let Some(n) = reader.read_bits(64) {
                    println!("  Samples:    {n}");
                }
            }
        }
        Algorithm::Gorilla | Algorithm::GorillaElf => {
            if let Some(n) = reader.read_bits(32) {
                println!("  Samples:    {n}");
            }
        }
        Algorithm::Deflate | Algorithm::Lz4 => {
            if let Some(n) = reader.read_bits(64) {
                println!("  Samples:    {n}");
            }
        }
    }
    Ok(())
}
