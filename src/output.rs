use std::io::Write;

use crate::{domain::report::StabilityReport, errors::AppError};

/// Writes all reports as one JSON array followed by a newline.
pub fn write_reports<W: Write>(
    writer: &mut W,
    reports: &[StabilityReport],
    compact: bool,
) -> Result<(), AppError> {
    let result = if compact {
        serde_json::to_writer(&mut *writer, reports)
    } else {
        serde_json::to_writer_pretty(&mut *writer, reports)
    };
    result.map_err(|err| AppError::output(err.to_string()))?;

    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|err| AppError::output(err.to_string()))
}
