//! Maloo results CLI
//!
//! Entry point for the `maloo-results` command-line tool. Prints a pass/fail
//! summary of the `results.yml` report inside the given directory.

use clap::Parser;
use maloo_tools::{ReportSummary, TestReport};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "maloo-results")]
#[command(about = "Summarize a results.yml test report", version)]
struct Cli {
    /// Directory containing results.yml
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let report = match TestReport::load(&cli.directory) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let summary = ReportSummary::from_report(&report);

    if cli.json {
        match summary.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else if let Err(e) = summary.write_human(io::stdout().lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
