use std::path::PathBuf;

use anyhow::Result;
use assist_stats::{Overrides, RunConfig, TextReport, summarize, to_json};
use clap::Parser;
use env_logger::Env;
use log::info;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Validate assist09 sequence files and print dataset statistics"
)]
struct Cli {
    /// Dataset files to scan (defaults to train.txt + test.txt under --data-root)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Directory holding train.txt and test.txt
    #[arg(long, value_name = "DIR")]
    data_root: Option<PathBuf>,

    /// Only scan train.txt; a missing file is an error
    #[arg(long)]
    train_only: bool,

    /// Fail instead of warning when any input file is missing
    #[arg(long)]
    required: bool,

    /// Maximum warnings to print before summarizing the rest
    #[arg(long, value_name = "N")]
    max_warnings: Option<usize>,

    /// Optional TOML config; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit the summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = match &cli.config {
        Some(path) => RunConfig::from_toml(path)?,
        None => RunConfig::default(),
    };
    config.apply_overrides(Overrides {
        files: cli.files,
        data_root: cli.data_root,
        max_warnings: cli.max_warnings,
        train_only: cli.train_only,
        required: cli.required,
    });

    let paths = config.resolve_paths();
    let summary = summarize(&paths, &config.summary_options())?;
    info!(
        "Completed scan: {} file(s), {} records, {} warnings",
        summary.files.len(),
        summary.records,
        summary.warnings.len()
    );

    if cli.json {
        println!("{}", to_json(&summary)?);
    } else {
        print!("{}", TextReport::new(&summary, config.max_warnings));
    }
    Ok(())
}
