use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::RowError;

const FIELD_NAMES: [&str; 5] = ["lot", "block", "address", "pocketSize", "status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Sold,
    Empty,
}

impl Status {
    /// Only the exact string `"SOLD"` marks a lot as sold.
    pub fn classify(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::String(s)) if s == "SOLD" => Status::Sold,
            _ => Status::Empty,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Sold => "SOLD",
            Status::Empty => "",
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub lot: i64,
    pub block: i64,
    pub address: String,
    pub pocket_size: i64,
    pub status: Status,
}

pub fn normalize_rows(upload: &Value) -> Result<Vec<Record>, RowError> {
    let rows = upload.as_array().ok_or(RowError::NotAnArray {
        found: json_kind(upload),
    })?;
    rows.iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index, row))
        .collect()
}

pub fn normalize_row(row: usize, raw: &Value) -> Result<Record, RowError> {
    let fields = match raw.as_array() {
        Some(fields) if fields.len() == 4 || fields.len() == 5 => fields,
        Some(fields) => {
            return Err(RowError::Shape {
                row,
                found: format!("{} fields", fields.len()),
            })
        }
        None => {
            return Err(RowError::Shape {
                row,
                found: json_kind(raw).to_string(),
            })
        }
    };

    Ok(Record {
        lot: integer_field(row, fields, 0)?,
        block: integer_field(row, fields, 1)?,
        address: string_field(row, fields, 2)?,
        pocket_size: integer_field(row, fields, 3)?,
        status: Status::classify(fields.get(4)),
    })
}

fn integer_field(row: usize, fields: &[Value], idx: usize) -> Result<i64, RowError> {
    let value = &fields[idx];
    let decoded = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            // spreadsheet exports sometimes write whole numbers as `3.0`
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    decoded.ok_or_else(|| RowError::FieldType {
        row,
        field: FIELD_NAMES[idx],
        expected: "an integer",
        found: describe(value),
    })
}

fn string_field(row: usize, fields: &[Value], idx: usize) -> Result<String, RowError> {
    match &fields[idx] {
        Value::String(s) => Ok(s.clone()),
        other => Err(RowError::FieldType {
            row,
            field: FIELD_NAMES[idx],
            expected: "a string",
            found: describe(other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        other => json_kind(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_exact_sold_is_sold() {
        assert_eq!(Status::classify(Some(&json!("SOLD"))), Status::Sold);
        for raw in [json!("sold"), json!("Sold"), json!("pending"), json!(""), json!(42), json!(null), json!(true)] {
            assert_eq!(Status::classify(Some(&raw)), Status::Empty, "{raw}");
        }
        assert_eq!(Status::classify(None), Status::Empty);
    }

    #[test]
    fn status_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Status::Sold).unwrap(), "\"SOLD\"");
        assert_eq!(serde_json::to_string(&Status::Empty).unwrap(), "\"\"");
    }

    #[test]
    fn normalizes_full_row() {
        let record = normalize_row(0, &json!([12, 3, "14 Elm St", 2, "SOLD"])).unwrap();
        assert_eq!(
            record,
            Record {
                lot: 12,
                block: 3,
                address: "14 Elm St".to_string(),
                pocket_size: 2,
                status: Status::Sold,
            }
        );
    }

    #[test]
    fn missing_status_column_is_empty() {
        let record = normalize_row(0, &json!([1, 1, "x", 0])).unwrap();
        assert_eq!(record.status, Status::Empty);
    }

    #[test]
    fn whole_floats_decode_as_integers() {
        let record = normalize_row(0, &json!([4.0, 2.0, "x", 1.0, ""])).unwrap();
        assert_eq!((record.lot, record.block, record.pocket_size), (4, 2, 1));
    }

    #[test]
    fn fractional_lot_is_rejected() {
        let err = normalize_row(7, &json!([4.5, 2, "x", 1, ""])).unwrap_err();
        assert_eq!(
            err,
            RowError::FieldType {
                row: 7,
                field: "lot",
                expected: "an integer",
                found: "number 4.5".to_string(),
            }
        );
    }

    #[test]
    fn string_lot_is_rejected() {
        let err = normalize_row(0, &json!(["1", 2, "x", 1, ""])).unwrap_err();
        assert!(matches!(err, RowError::FieldType { field: "lot", .. }));
    }

    #[test]
    fn numeric_address_is_rejected() {
        let err = normalize_row(2, &json!([1, 2, 99, 1, ""])).unwrap_err();
        assert!(matches!(err, RowError::FieldType { row: 2, field: "address", .. }));
    }

    #[test]
    fn pocket_size_must_be_integer() {
        let err = normalize_row(0, &json!([1, 2, "x", null, ""])).unwrap_err();
        assert!(matches!(err, RowError::FieldType { field: "pocketSize", .. }));
    }

    #[test]
    fn wrong_row_shapes() {
        assert!(matches!(normalize_row(0, &json!([1, 2, "x"])), Err(RowError::Shape { .. })));
        assert!(matches!(
            normalize_row(0, &json!([1, 2, "x", 1, "", "extra"])),
            Err(RowError::Shape { .. })
        ));
        assert!(matches!(normalize_row(0, &json!({"lot": 1})), Err(RowError::Shape { .. })));
    }

    #[test]
    fn batch_fails_on_first_bad_row() {
        let upload = json!([[1, 1, "a", 0, "SOLD"], [2, "b", "b", 0, ""], [3, 1, 5, 0, ""]]);
        let err = normalize_rows(&upload).unwrap_err();
        assert!(matches!(err, RowError::FieldType { row: 1, field: "block", .. }));
    }

    #[test]
    fn top_level_must_be_array() {
        let err = normalize_rows(&json!({"rows": []})).unwrap_err();
        assert_eq!(err, RowError::NotAnArray { found: "an object" });
    }
}
