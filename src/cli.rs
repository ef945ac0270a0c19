use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::dump::{DEFAULT_ARTIFACT, DEFAULT_BUILD_CMD};
use crate::writer::OutputFormat;

/// Test command used when neither `--input` nor a command is given.
pub const DEFAULT_TEST_CMD: [&str; 4] = ["cargo", "test-sbf", "--", "--nocapture"];

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute-unit report from program test logs")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub report: ReportArgs,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the tests (or read a log) and print per-label compute usage
    Report(ReportArgs),
    /// Build the program and run the dump script on the artifact
    Dump(DumpArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Read an existing log instead of running a command (`-` for stdin)
    #[arg(short, long, conflicts_with = "cmd")]
    pub input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Keep a copy of the captured test output
    #[arg(long)]
    pub keep_log: Option<PathBuf>,

    /// Do not echo the test output while it runs
    #[arg(short, long)]
    pub quiet: bool,

    /// Test command and its arguments
    #[arg(last = true)]
    pub cmd: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    /// Dump script invoked with the artifact path
    #[arg(long, env = "CU_REPORT_DUMP_SCRIPT")]
    pub script: PathBuf,

    #[arg(long, default_value = DEFAULT_ARTIFACT)]
    pub artifact: PathBuf,

    #[arg(long, default_value = DEFAULT_BUILD_CMD)]
    pub build_cmd: String,
}
