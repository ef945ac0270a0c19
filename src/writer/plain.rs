//! Whitespace-separated rows, ready for `column -t` or `awk`.

use std::io::Write;

use crate::error::Result;
use crate::model::ConsumptionRecord;

pub fn emit<I, W>(records: I, mut out: W) -> Result<usize>
where
    I: IntoIterator<Item = Result<ConsumptionRecord>>,
    W: Write,
{
    let mut count = 0;
    for record in records {
        let r = record?;
        writeln!(out, "{} {} {}", r.instruction, r.label, r.delta)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}
