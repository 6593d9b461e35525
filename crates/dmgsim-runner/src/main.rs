//! `dmgsim` command line interface.

use clap::{Args, Parser, Subcommand};
use dmgsim_runner::{compare, load_params, run, RunnerError, Tables};
use dmgsim_study::Strategy;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "IEEE 802.11ad beacon interval timing studies")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one study and print its record as JSON
    Run {
        #[command(flatten)]
        inputs: Inputs,

        /// Schedule engine
        #[arg(long, default_value_t = Strategy::Fast)]
        strategy: Strategy,
    },
    /// Run both schedule engines and print their throughput difference
    Compare {
        #[command(flatten)]
        inputs: Inputs,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    /// Study parameters (YAML)
    #[arg(short, long)]
    config: PathBuf,

    /// BER table (YAML)
    #[arg(long)]
    ber: PathBuf,

    /// MCS table replacing the built-in one (YAML)
    #[arg(long)]
    mcs: Option<PathBuf>,

    /// Include per-MSDU generation and arrival times
    #[arg(long)]
    raw_times: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr, stdout carries the JSON record
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), RunnerError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn execute(command: Command) -> Result<bool, RunnerError> {
    match command {
        Command::Run { inputs, strategy } => {
            let params = load_params(&inputs.config)?;
            let tables = Tables::load(&inputs.ber, inputs.mcs.as_deref())?;
            let record = run(params, &tables, strategy, inputs.raw_times);
            print_json(&record)?;
            Ok(record.is_ok())
        }
        Command::Compare { inputs } => {
            let params = load_params(&inputs.config)?;
            let tables = Tables::load(&inputs.ber, inputs.mcs.as_deref())?;
            let comparison = compare(params, &tables, inputs.raw_times);
            print_json(&comparison)?;
            Ok(comparison.descriptive.is_ok() && comparison.fast.is_ok())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!(%err, "dmgsim failed");
            eprintln!("Error: {}", err);
            ExitCode::from(2)
        }
    }
}
