/*!
Main binary for rill-validate.

Checks each input for JSON validity and reports through the exit code:
`0` when every input is valid, `1` when any is invalid, `2` on I/O errors.
*/

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rill_validate::{
    Validator, ValidatorOptions, DEFAULT_MAX_DEPTH, MAX_JSON_SIZE_BYTES, MAX_SAFE_DEPTH,
};

/// Check whether files (or STDIN) hold exactly one valid JSON document.
#[derive(Parser)]
#[command(name = "rill-validate", version, about, long_about = None)]
struct Args {
    /// Paths to JSON files. If omitted, or for `-`, reads from STDIN
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,
    /// Print the first error found in each invalid input
    #[arg(short, long)]
    explain: bool,
    /// Print nothing, report only through the exit code
    #[arg(short, long, conflicts_with = "explain")]
    silent: bool,
    /// Maximum nesting depth of objects and arrays (at most 1024)
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_MAX_DEPTH as u64,
        value_parser = clap::value_parser!(u64).range(0..=MAX_SAFE_DEPTH as u64)
    )]
    max_depth: u64,
    /// Maximum input size in bytes
    #[arg(long, value_name = "N", default_value_t = MAX_JSON_SIZE_BYTES)]
    max_bytes: usize,
    #[command(flatten)]
    verbose: Verbosity,
}

/// Reads one input, where `-` means STDIN.
fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read STDIN")?;
        return Ok(buffer);
    }
    fs::read(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Validates every input and returns whether all of them were valid.
fn run(args: &Args) -> Result<bool> {
    let validator = Validator::new(
        ValidatorOptions::default()
            .max_depth(args.max_depth as usize)
            .max_input_bytes(Some(args.max_bytes)),
    );

    let stdin = [PathBuf::from("-")];
    let inputs = if args.inputs.is_empty() {
        &stdin[..]
    } else {
        &args.inputs[..]
    };

    let mut all_valid = true;
    for path in inputs {
        let name = if path.as_os_str() == "-" {
            "<stdin>".to_string()
        } else {
            path.display().to_string()
        };
        let content = read_input(path)?;
        log::info!("checking {} ({} bytes)", name, content.len());

        match validator.validate(&content) {
            Ok(()) => {
                if !args.silent {
                    println!("{}: valid", name);
                }
            }
            Err(e) => {
                all_valid = false;
                if args.explain {
                    println!("{}: invalid\n  {}", name, e);
                } else if !args.silent {
                    println!("{}: invalid", name);
                }
            }
        }
    }

    Ok(all_valid)
}

/// Entry point for main binary.
///
/// Sets up logging from the verbosity flags, then validates the inputs.
fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
