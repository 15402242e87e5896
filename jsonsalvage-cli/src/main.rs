//! Command-line validator for JSON files with embedded JSON strings.
//!
//! Exit codes:
//! - `0` - the file is valid JSON and every recognizable nested JSON
//!   string parses as well
//! - `1` - a parse error was found (top-level or nested); diagnostics go
//!   to stdout
//! - `2` - the file could not be read or is not valid UTF-8; the message
//!   goes to stderr

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use jsonsalvage::validate::{parse_document, validate, ValidatorOptions};

#[derive(Debug, Parser)]
#[command(author, version, about = "Validate a JSON file, including JSON embedded in string fields.", long_about = None)]
struct Args {
    /// Path to the JSON file to validate.
    file: PathBuf,

    /// Maximum displayed length of an offending string snippet.
    #[arg(long, value_name = "INT", default_value_t = 200)]
    max_str_len: usize,

    /// Only treat a string as embedded JSON when it both starts and ends
    /// with a matching {} or [] pair (default: a leading { or [ suffices).
    #[arg(long)]
    strict_startend: bool,
}

fn read_input(path: &PathBuf) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", path.display()))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let text = match read_input(&args.file) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(2);
        }
    };

    let value = match parse_document(&text) {
        Ok(value) => value,
        Err(err) => {
            println!("{err}");
            return ExitCode::from(1);
        }
    };

    let options = ValidatorOptions {
        max_snippet_len: args.max_str_len,
        strict_delimiters: args.strict_startend,
        ..ValidatorOptions::default()
    };
    let diagnostics = validate(&value, &options);

    if diagnostics.is_empty() {
        println!("OK: the file is valid JSON and all recognizable nested JSON parses.");
        return ExitCode::SUCCESS;
    }

    println!("Found nested JSON parse errors:");
    for (index, diagnostic) in diagnostics.iter().enumerate() {
        println!("\n[{}] {diagnostic}", index + 1);
    }
    if diagnostics.len() == options.max_diagnostics {
        println!("\n(stopped at the {}-diagnostic ceiling; more may exist)", options.max_diagnostics);
    }
    ExitCode::from(1)
}
