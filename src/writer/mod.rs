//! Renderers for `ConsumptionRecord` streams.
pub mod json;
pub mod plain;
pub mod table;

use std::io::Write;

use clap::ValueEnum;

use crate::error::Result;
use crate::model::ConsumptionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `instruction label delta`, one record per line, as produced
    Plain,
    /// Column-aligned table with a header
    #[default]
    Table,
    /// One JSON object per line
    Json,
}

/// Drain `records` into `out` in the requested format. Returns how many
/// records were written; the first error stops the stream.
pub fn emit<I, W>(format: OutputFormat, records: I, out: W) -> Result<usize>
where
    I: IntoIterator<Item = Result<ConsumptionRecord>>,
    W: Write,
{
    match format {
        OutputFormat::Plain => plain::emit(records, out),
        OutputFormat::Table => table::emit(records, out),
        OutputFormat::Json => json::emit(records, out),
    }
}
