//! Maloo upload CLI
//!
//! Entry point for the `maloo-upload` command-line tool. Packages a test-log
//! directory and ships it to the Maloo collection server.

use clap::Parser;
use log::LevelFilter;
use maloo_tools::transfer::ScpTransfer;
use maloo_tools::upload::{self, UploadError, UploadOptions};
use maloo_tools::UploadConfig;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "maloo-upload")]
#[command(about = "Package a Lustre test-log directory and upload it to Maloo", version)]
struct Cli {
    /// Output more information
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Erase log files after a successful upload
    #[arg(short = 'e', long)]
    erase: bool,

    /// Directory containing the logs to package
    #[arg(short = 'd', long = "logdir", value_name = "DIRECTORY")]
    logdir: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    println!("Processing directory {}", cli.logdir.display());

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), UploadError> {
    let config = UploadConfig::load_default()?;
    let transfer = ScpTransfer::new(config.target(), config.connect_timeout_seconds);

    let options = UploadOptions {
        logdir: cli.logdir.clone(),
        erase: cli.erase,
    };
    let report = upload::run(&options, &transfer)?;

    println!(
        "Uploaded {} ({} entries) to {}",
        report.archive_name,
        report.entries,
        config.target()
    );
    if report.erased > 0 {
        println!("Erased {} log entries", report.erased);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
