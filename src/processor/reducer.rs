//! Pairs "before"/"after" compute readings into `ConsumptionRecord`s.
//!
//! `ParseState::step` is the whole state machine; `Reducer` only drives it
//! over a stream of lines.

use std::io::{self, BufRead};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{ClassifiedLine, ConsumptionRecord, ParseState, Phase};
use crate::processor::classify::classify;

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure transition: consumes the state and returns the next one, plus a
    /// record when this line closes a window. `line_no` is only used for errors.
    pub fn step(
        mut self,
        line: ClassifiedLine<'_>,
        line_no: usize,
    ) -> Result<(ParseState, Option<ConsumptionRecord>)> {
        match line {
            ClassifiedLine::InstructionMarker(name) => {
                self.pending_instruction = Some(name.to_string());
                Ok((self, None))
            }
            ClassifiedLine::Label(label) => {
                if self.phase == Phase::AwaitingBefore {
                    debug!(line = line_no, dropped = %self.label, "label restarted open window");
                }
                self.phase = Phase::AwaitingBefore;
                self.label = label.to_string();
                Ok((self, None))
            }
            ClassifiedLine::Consumption(field) => match self.phase {
                Phase::Idle => Ok((self, None)),
                Phase::AwaitingBefore => {
                    self.before_value = parse_value(field, line_no)?;
                    self.phase = Phase::AwaitingAfter;
                    Ok((self, None))
                }
                Phase::AwaitingAfter => {
                    let after = parse_value(field, line_no)?;
                    let delta = self.before_value.checked_sub(after).ok_or_else(|| {
                        Error::MalformedNumericField {
                            line: line_no,
                            value: field.unwrap_or_default().to_string(),
                        }
                    })?;
                    let record = ConsumptionRecord {
                        instruction: self.pending_instruction.clone().unwrap_or_default(),
                        label: std::mem::take(&mut self.label),
                        delta,
                    };
                    self.phase = Phase::Idle;
                    Ok((self, Some(record)))
                }
            },
            ClassifiedLine::Other => Ok((self, None)),
        }
    }

    /// In-place variant of [`ParseState::step`] for callers that own a raw line.
    pub fn feed(&mut self, line: &str, line_no: usize) -> Result<Option<ConsumptionRecord>> {
        let (next, record) = std::mem::take(self).step(classify(line), line_no)?;
        *self = next;
        Ok(record)
    }

    /// Called once the input is exhausted. An open window is dropped.
    pub fn finish(self) {
        if self.phase != Phase::Idle {
            debug!(label = %self.label, phase = ?self.phase, "stream ended inside a window");
        }
    }
}

fn parse_value(field: Option<&str>, line_no: usize) -> Result<i64> {
    let raw = field.unwrap_or_default();
    raw.parse::<i64>()
        .map_err(|_| Error::MalformedNumericField {
            line: line_no,
            value: raw.to_string(),
        })
}

/// Lazy record stream over a fallible sequence of lines.
///
/// Stops for good after the first error, whether it came from the line
/// source or from the state machine.
pub struct Reducer<I> {
    lines: I,
    state: Option<ParseState>,
    line_no: usize,
}

impl<I, L> Reducer<I>
where
    I: Iterator<Item = Result<L>>,
    L: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            state: Some(ParseState::new()),
            line_no: 0,
        }
    }
}

impl<I, L> Iterator for Reducer<I>
where
    I: Iterator<Item = Result<L>>,
    L: AsRef<str>,
{
    type Item = Result<ConsumptionRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let state = self.state.as_mut()?;
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.state = None;
                    return Some(Err(e));
                }
                None => {
                    if let Some(state) = self.state.take() {
                        state.finish();
                    }
                    return None;
                }
            };
            self.line_no += 1;

            match state.feed(line.as_ref(), self.line_no) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => {
                    self.state = None;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Reduce lines that cannot fail to read.
pub fn reduce_lines<I>(lines: I) -> Reducer<impl Iterator<Item = Result<I::Item>>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Reducer::new(lines.into_iter().map(Ok::<_, Error>))
}

/// Convenience: reduce every line of an in-memory log.
pub fn reduce_str(log: &str) -> Reducer<impl Iterator<Item = Result<&str>>> {
    reduce_lines(log.lines())
}

/// Reduce a buffered reader line by line. Read errors end the stream;
/// bytes that are not UTF-8 do not.
pub fn reduce_reader<R: BufRead>(reader: R) -> Reducer<impl Iterator<Item = Result<String>>> {
    Reducer::new(lossy_lines(reader).map(|line| line.map_err(Error::Io)))
}

/// Split on `\n` (dropping a trailing `\r`) and decode each line lossily.
/// Invalid UTF-8 is replaced, never reported.
pub fn lossy_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader.split(b'\n').map(|line| -> io::Result<String> {
        let mut bytes = line?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    })
}
