//! ndnkey CLI application.
//!
//! Generates one key for an NDN identity and exports it as `<file>.pri` and
//! `<file>.ndncert`.

use clap::Parser;
use ndnkey::crypto::algorithm::AlgorithmKind;
use ndnkey::error::{NdnKeyError, Result};
use ndnkey::issue::{
    IssueConfig, IssueReport, IssueRun, RunState, DEFAULT_IDENTITY, DEFAULT_OUTPUT_BASE,
};
use ndnkey::storage::encoding::PrivateKeyEncoding;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ndnkey")]
#[command(about = "Generate an NDN identity key and its self-signed certificate", long_about = None)]
struct Cli {
    /// Identity path (NDN URI)
    #[arg(short, long, default_value = DEFAULT_IDENTITY)]
    identity: String,

    /// Key algorithm: rsa, ecdsa, or hmac
    #[arg(short, long, visible_alias = "algorithm", default_value = "rsa")]
    encryption: String,

    /// Output base name; writes <file>.pri and <file>.ndncert
    #[arg(short, long, default_value = DEFAULT_OUTPUT_BASE)]
    file: PathBuf,

    /// Private key format: pem, der, or raw (default depends on the algorithm)
    #[arg(long)]
    format: Option<String>,

    /// Certificate validity in days
    #[arg(long, default_value_t = 365)]
    validity_days: u32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut run = IssueRun::new(config);
    match run.execute() {
        Ok(report) => match print_report(&report, cli.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Failed to print report");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            match run.state() {
                RunState::Failed { at } => tracing::error!(stage = %at, error = %e, "Issue failed"),
                _ => tracing::error!(error = %e, "Issue failed"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<IssueConfig> {
    let algorithm = cli.encryption.parse::<AlgorithmKind>()?;
    let mut config = IssueConfig::new(&cli.identity, algorithm, cli.file.clone())?
        .with_validity_days(cli.validity_days)?;

    if let Some(format) = &cli.format {
        config = config.with_encoding(format.parse::<PrivateKeyEncoding>()?)?;
    }

    Ok(config)
}

fn print_report(report: &IssueReport, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| NdnKeyError::EncodingError(format!("Failed to serialize report: {}", e)))?;
        println!("{}", text);
    } else {
        println!("{} exported", report.certificate_name);
    }
    Ok(())
}
