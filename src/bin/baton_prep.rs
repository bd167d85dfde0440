//! baton-prep: Turn the conductor timeline sheet into the visualization's JSON
//!
//! Usage:
//!   # Read the default worksheet, write cleaned_data.json
//!   baton-prep "Conductor Timeline Data_Contest.xlsx"
//!
//!   # CSV export, custom destination
//!   baton-prep timeline.csv --output public/data/cleaned_data.json
//!
//!   # Log dataset statistics after writing
//!   RUST_LOG=info baton-prep timeline.xlsx --summary

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use baton::{summarize, TransformConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "baton-prep")]
#[command(about = "Convert the conductor timeline spreadsheet into JSON records", long_about = None)]
struct Args {
    /// Spreadsheet (.xlsx, .xls, .ods) or .csv file to read
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Destination JSON file, replaced on every run (default: cleaned_data.json)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Worksheet to read from a spreadsheet (default: "Conductor Timeline")
    #[arg(long)]
    sheet: Option<String>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Log a dataset summary after writing
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = TransformConfig::default();
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(output) = args.output {
        config.destination = output;
    }
    if let Some(sheet) = args.sheet {
        config.sheet = sheet;
    }
    config.compact = args.compact;

    let records = baton::run(&config)?;

    if args.summary {
        let summary = summarize(&records);
        log::info!("Summary: {}", serde_json::to_string(&summary)?);
    }

    println!(
        "Data updated! Extracted {} records with complete dictionary details.",
        records.len()
    );

    Ok(())
}
