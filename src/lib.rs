pub mod capture;
pub mod cli;
pub mod dump;
pub mod error;
pub mod model;
pub mod processor;
pub mod writer;

pub use error::{Error, Result};
pub use model::{ConsumptionRecord, ParseState, Phase};

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, DEFAULT_TEST_CMD, DumpArgs, ReportArgs};

pub fn run() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Some(Commands::Report(ref report_args)) => report(report_args),
        Some(Commands::Dump(ref dump_args)) => dump(dump_args),
        None => report(&args.report),
    }
}

/// Exit code for a failed `run`, taken from the first crate error in the chain.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<Error>())
        .map_or(1, Error::exit_code)
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "cu_report=debug"
    } else {
        "cu_report=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn report(args: &ReportArgs) -> anyhow::Result<()> {
    let stdout = io::stdout().lock();

    // 1. ── Existing log ───────────────────────────────────────────────
    if let Some(path) = &args.input {
        let count = if path.as_os_str() == "-" {
            writer::emit(args.format, processor::reduce_reader(io::stdin().lock()), stdout)
                .with_context(|| "Reducing log from stdin")?
        } else {
            let file =
                File::open(path).with_context(|| format!("Reading {}", path.display()))?;
            writer::emit(args.format, processor::reduce_reader(BufReader::new(file)), stdout)
                .with_context(|| format!("Reducing {}", path.display()))?
        };
        log_count(count);
        return Ok(());
    }

    // 2. ── Capture ────────────────────────────────────────────────────
    let cmd = if args.cmd.is_empty() {
        DEFAULT_TEST_CMD.map(String::from).to_vec()
    } else {
        args.cmd.clone()
    };
    let capture = capture::run(&cmd, !args.quiet).with_context(|| "Running test command")?;
    if let Some(dest) = &args.keep_log {
        capture
            .persist(dest)
            .with_context(|| format!("Writing {}", dest.display()))?;
    }

    // 3. ── Reduce + write ─────────────────────────────────────────────
    let reader = capture.reader()?;
    let count = writer::emit(args.format, processor::reduce_reader(reader), stdout)
        .with_context(|| "Reducing captured test output")?;
    log_count(count);

    // records are still printed for a failing run
    capture.check_status()?;
    Ok(())
}

fn log_count(count: usize) {
    if count == 0 {
        warn!("no compute measurements found");
    } else {
        info!(records = count, "compute report written");
    }
}

fn dump(args: &DumpArgs) -> anyhow::Result<()> {
    let config = dump::DumpConfig {
        script: args.script.clone(),
        artifact: args.artifact.clone(),
        build_cmd: args.build_cmd.clone(),
    };
    dump::run(&config).with_context(|| "Building and dumping program")
}
