//! JSON-lines output, one object per record.

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
        serde_json::to_writer(&mut out, &r)?;
        out.write_all(b"\n")?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_json_lines() {
        let records = vec![
            Ok(ConsumptionRecord {
                instruction: "RingBuf".into(),
                label: "Iterating".into(),
                delta: 12,
            }),
            Ok(ConsumptionRecord {
                instruction: String::new(),
                label: "grow".into(),
                delta: -3,
            }),
        ];
        let mut buf = Vec::new();
        assert_eq!(emit(records, &mut buf).unwrap(), 2);

        let text = String::from_utf8(buf).unwrap();
        let rows: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(
            rows,
            vec![
                json!({"instruction": "RingBuf", "label": "Iterating", "delta": 12}),
                json!({"instruction": "", "label": "grow", "delta": -3}),
            ]
        );
    }
}
