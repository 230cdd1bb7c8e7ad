//! Single-row (or few-row) feature table built from request records.
//!
//! Column names are the record's serialised field names, so the table lines
//! up with whatever column names the model was trained on.

use super::error::InferenceError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

impl Cell {
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Text(_) => "text",
            Cell::Integer(_) => "an integer",
            Cell::Float(_) => "a float",
            Cell::Missing => "nothing",
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            Value::String(s) => Cell::Text(s),
            Value::Bool(b) => Cell::Integer(i64::from(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Integer(i),
                None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Missing),
            },
            other => Cell::Text(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl FeatureFrame {
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, InferenceError> {
        Self::from_records(std::slice::from_ref(record))
    }

    /// Columns are the union of all record fields; a record lacking a column
    /// gets a missing cell there.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self, InferenceError> {
        let mut frame = FeatureFrame::default();

        for record in records {
            let Value::Object(fields) = serde_json::to_value(record)? else {
                return Err(InferenceError::NotARecord);
            };

            let mut row = vec![Cell::Missing; frame.columns.len()];
            for (name, value) in fields {
                match frame.column_index(&name) {
                    Some(idx) => row[idx] = Cell::from(value),
                    None => {
                        frame.columns.push(name);
                        for existing in &mut frame.rows {
                            existing.push(Cell::Missing);
                        }
                        row.push(Cell::from(value));
                    }
                }
            }
            frame.rows.push(row);
        }

        Ok(frame)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// `None` when the column does not exist at all.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_record_becomes_one_row() {
        let frame = FeatureFrame::from_record(&json!({
            "GeneSymbol": "BRCA1",
            "PositionVCF": 43044295,
            "Score": 0.5,
        }))
        .unwrap();

        assert_eq!(frame.len(), 1);
        assert_eq!(frame.columns().len(), 3);
        assert_eq!(
            frame.cell(0, "GeneSymbol"),
            Some(&Cell::Text("BRCA1".into()))
        );
        assert_eq!(frame.cell(0, "PositionVCF"), Some(&Cell::Integer(43044295)));
        assert_eq!(frame.cell(0, "Score"), Some(&Cell::Float(0.5)));
        assert_eq!(frame.cell(0, "Chromosome"), None);
    }

    #[test]
    fn later_records_extend_columns() {
        let frame = FeatureFrame::from_records(&[
            json!({ "a": 1 }),
            json!({ "a": 2, "b": "x" }),
        ])
        .unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.cell(0, "b"), Some(&Cell::Missing));
        assert_eq!(frame.cell(1, "b"), Some(&Cell::Text("x".into())));
    }

    #[test]
    fn null_is_missing() {
        let frame = FeatureFrame::from_record(&json!({ "a": null })).unwrap();
        assert_eq!(frame.cell(0, "a"), Some(&Cell::Missing));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = FeatureFrame::from_record(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, InferenceError::NotARecord));
    }
}
