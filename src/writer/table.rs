//! Column-aligned table, the same shape `column -t` would give.
//!
//! Widths depend on every row, so records are collected before anything
//! is written.

use std::io::Write;

use crate::error::Result;
use crate::model::ConsumptionRecord;

const HEADER: [&str; 3] = ["INSTRUCTION", "LABEL", "CU"];
const GUTTER: &str = "  ";

pub fn emit<I, W>(records: I, mut out: W) -> Result<usize>
where
    I: IntoIterator<Item = Result<ConsumptionRecord>>,
    W: Write,
{
    let rows = records
        .into_iter()
        .map(|r| r.map(row))
        .collect::<Result<Vec<_>>>()?;

    if rows.is_empty() {
        return Ok(0);
    }

    let mut widths = HEADER.map(str::len);
    // `{:<w$}` pads by chars, so widths count chars too
    for cells in &rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_row(&mut out, &HEADER.map(String::from), &widths)?;
    for cells in &rows {
        write_row(&mut out, cells, &widths)?;
    }
    out.flush()?;
    Ok(rows.len())
}

fn row(r: ConsumptionRecord) -> [String; 3] {
    let instruction = if r.instruction.is_empty() {
        "-".to_string()
    } else {
        r.instruction
    };
    [instruction, r.label, r.delta.to_string()]
}

fn write_row<W: Write>(out: &mut W, cells: &[String; 3], widths: &[usize; 3]) -> Result<()> {
    // delta is right-aligned, everything else left-aligned
    writeln!(
        out,
        "{:<w0$}{GUTTER}{:<w1$}{GUTTER}{:>w2$}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    )?;
    Ok(())
}
