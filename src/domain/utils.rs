//! Report file naming, timestamp, and column header helpers

use std::sync::OnceLock;

use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use crate::{config::TimestampZone, errors::ReportError};

pub const ARCHIVE_DIR_NAME: &str = "Processed";
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

fn report_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^Stability_([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}-[0-9]{2}-[0-9]{2})\.txt$",
        )
        .expect("report file pattern compiles")
    })
}

fn non_word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\W+").expect("non-word pattern compiles"))
}

pub fn is_report_file_name(name: &str) -> bool {
    report_file_pattern().is_match(name)
}

/// Returns the `YYYY-MM-DDTHH-MM-SS` part of a report file name.
pub fn file_name_timestamp(name: &str) -> Result<&str, ReportError> {
    report_file_pattern()
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str())
        .ok_or_else(|| ReportError::FileName {
            name: name.to_string(),
        })
}

pub fn parse_epoch(name: &str, zone: TimestampZone) -> Result<i64, ReportError> {
    let raw = file_name_timestamp(name)?;
    let naive = NaiveDateTime::parse_from_str(raw, FILE_TIMESTAMP_FORMAT).map_err(|err| {
        ReportError::Timestamp {
            value: raw.to_string(),
            message: err.to_string(),
        }
    })?;

    let epoch = match zone {
        TimestampZone::Utc => Utc.from_utc_datetime(&naive).timestamp(),
        TimestampZone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|datetime| datetime.timestamp())
            .ok_or_else(|| ReportError::Timestamp {
                value: raw.to_string(),
                message: "time does not exist in the local time zone".to_string(),
            })?,
    };

    Ok(epoch)
}

/// Turns a raw header token into a key segment: `drift[%]` becomes `driftpct`.
pub fn normalize_column_name(header: &str) -> String {
    let header = header.replace("[%]", "pct");
    non_word_pattern().replace_all(&header, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_report_file_names() {
        assert!(is_report_file_name("Stability_2024-03-01T07-30-00.txt"));
        assert!(!is_report_file_name("Stability_2024-03-01T07-30-00.txt.bak"));
        assert!(!is_report_file_name("Stability_2024-03-01.txt"));
        assert!(!is_report_file_name("mristability.log"));
    }

    #[test]
    fn parses_utc_epoch_from_file_name() {
        let epoch = parse_epoch("Stability_2024-03-01T07-30-00.txt", TimestampZone::Utc)
            .expect("valid timestamp");
        assert_eq!(epoch, 1_709_278_200);
    }

    #[test]
    fn parses_local_epoch_from_file_name() {
        let naive = NaiveDateTime::parse_from_str("2024-03-01T07-30-00", FILE_TIMESTAMP_FORMAT)
            .expect("valid naive timestamp");
        let expected = Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|datetime| datetime.timestamp());

        let epoch = parse_epoch("Stability_2024-03-01T07-30-00.txt", TimestampZone::Local).ok();
        assert_eq!(epoch, expected);
        assert!(epoch.is_some());
    }

    #[test]
    fn rejects_impossible_dates() {
        let err = parse_epoch("Stability_2024-13-01T07-30-00.txt", TimestampZone::Utc)
            .expect_err("expected invalid month");
        assert!(matches!(err, ReportError::Timestamp { .. }));
    }

    #[test]
    fn rejects_foreign_file_names() {
        let err = parse_epoch("notes.txt", TimestampZone::Utc).expect_err("expected bad name");
        assert!(matches!(err, ReportError::FileName { .. }));
    }

    #[test]
    fn normalizes_column_names() {
        assert_eq!(normalize_column_name("drift[%]"), "driftpct");
        assert_eq!(normalize_column_name("S/N"), "SN");
        assert_eq!(normalize_column_name("mean"), "mean");
        assert_eq!(normalize_column_name("p-p[%]"), "pppct");
    }
}
