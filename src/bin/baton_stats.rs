//! baton-stats: Summarize a document produced by baton-prep
//!
//! Usage:
//!   # Read from file, output to stdout
//!   baton-stats cleaned_data.json
//!
//!   # Read from stdin with compact output
//!   cat cleaned_data.json | baton-stats --compact

use anyhow::{Context, Result};
use baton::{OutputRecord, SummaryBuilder};
use clap::Parser;
use std::fs::File;
use std::io::{stdin, BufReader, Read};

#[derive(Parser, Debug)]
#[command(name = "baton-stats")]
#[command(about = "Print headline statistics for a cleaned timeline document", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?,
        ))
    } else {
        Box::new(BufReader::new(stdin()))
    };

    let records: Vec<OutputRecord> =
        serde_json::from_reader(reader).context("Input is not a timeline document")?;

    if records.is_empty() {
        log::warn!("No records found in input");
    }

    let mut builder = SummaryBuilder::new();
    builder.add_records(&records);
    let summary = builder.build();

    let output = if args.compact {
        serde_json::to_string(&summary)?
    } else {
        serde_json::to_string_pretty(&summary)?
    };

    println!("{}", output);

    Ok(())
}
