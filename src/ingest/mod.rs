pub mod dataset;
pub mod preamble;
pub mod row;

pub use dataset::Dataset;
pub use preamble::strip_preamble;
pub use row::{normalize_row, normalize_rows, Record, Status};

use crate::error::UploadError;

/// Preamble, JSON, rows, dataset. Any failure rejects the whole upload.
pub fn parse_upload(body: &[u8]) -> Result<Dataset, UploadError> {
    let payload = strip_preamble(body)?;
    let upload: serde_json::Value = serde_json::from_slice(payload)?;
    let records = normalize_rows(&upload)?;
    Ok(Dataset::build(records))
}
