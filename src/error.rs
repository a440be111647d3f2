use thiserror::Error;

/// A single row that could not be decoded into a [`crate::ingest::Record`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("upload must be a JSON array of rows, found {found}")]
    NotAnArray { found: &'static str },

    #[error("row {row}: expected an array of 4 or 5 fields, found {found}")]
    Shape { row: usize, found: String },

    #[error("row {row}: field `{field}` must be {expected}, found {found}")]
    FieldType {
        row: usize,
        field: &'static str,
        expected: &'static str,
        found: String,
    },
}

/// Why an upload body was rejected. The store is never touched when one of these is returned.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("body has {lines_found} of the 2 preamble lines")]
    MissingPreamble { lines_found: usize },

    #[error("invalid JSON after preamble: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Row(#[from] RowError),
}
