//! Line classifier for program log output.
//!
//! At this stage we *only* decide what kind of line we are looking at and
//! slice out the interesting part. No numbers are parsed here: a
//! consumption value is handed over as raw text, because the reducer only
//! cares about it inside an open window.
//
//  Recognised shapes (first match wins):
//
//      <prefix> Program log: Instruction: <... NAME>
//      <prefix> Program log: #<LABEL>
//      <prefix> Program consumption: <f1> <f2> <f3> <f4> <f5> <VALUE> <...>
//
//  Anything else is `Other`.

use crate::model::{
    CONSUMPTION_FIELD, CONSUMPTION_MARKER, ClassifiedLine, INSTRUCTION_MARKER, LABEL_MARKER,
};

pub fn classify(line: &str) -> ClassifiedLine<'_> {
    if line.contains(INSTRUCTION_MARKER) {
        // the marker itself ends in a token, so there is always a last one
        let name = line.split_whitespace().next_back().unwrap_or_default();
        return ClassifiedLine::InstructionMarker(name);
    }

    if line.contains(LABEL_MARKER) {
        let label = line
            .split_once('#')
            .map(|(_, rest)| rest.trim())
            .unwrap_or_default();
        return ClassifiedLine::Label(label);
    }

    if let Some((_, rest)) = line.split_once(CONSUMPTION_MARKER) {
        return ClassifiedLine::Consumption(rest.split_whitespace().nth(CONSUMPTION_FIELD - 1));
    }

    ClassifiedLine::Other
}
