use serde::Serialize;

/// Substring that marks an instruction-name line.
pub const INSTRUCTION_MARKER: &str = "Program log: Instruction:";
/// Substring that opens a measurement window; the label follows the first `#`.
pub const LABEL_MARKER: &str = "Program log: #";
/// Substring of a compute-budget reading.
pub const CONSUMPTION_MARKER: &str = "Program consumption:";
/// 1-based position of the budget value among the fields after `CONSUMPTION_MARKER`.
pub const CONSUMPTION_FIELD: usize = 6;

/// One log line after classification. Borrows from the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifiedLine<'a> {
    InstructionMarker(&'a str),
    Label(&'a str),
    /// Raw 6th field, `None` when the line is too short to have one.
    Consumption(Option<&'a str>),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingBefore,
    AwaitingAfter,
}

/// Everything the reducer remembers between two lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseState {
    /// Last instruction seen; never cleared once set.
    pub pending_instruction: Option<String>,
    pub phase: Phase,
    /// Label of the open window.
    pub label: String,
    /// Only meaningful while `phase == AwaitingAfter`.
    pub before_value: i64,
}

/// One measured sub-operation: `delta = before - after`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumptionRecord {
    pub instruction: String,
    pub label: String,
    pub delta: i64,
}
