//! Stability report text parsing
//!
//! A report starts with a configuration line naming the receive channel count,
//! followed by any number of result sections. Each section is a header row
//! introduced by `slice#` and exactly sixteen slice rows.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    config::TimestampZone,
    domain::{
        report::{HeadCoil, StabilityReport},
        utils::{normalize_column_name, parse_epoch},
    },
    errors::ReportError,
};

pub const SLICE_COUNT: usize = 16;

fn configuration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^Stability configuration: 16 slices, 500 measurements, ([0-9]{2}) channels$")
            .expect("configuration pattern compiles")
    })
}

fn section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let mut pattern = String::from(r"Stability (.+?) results:\n\nslice#(.*)\n");
        for slice in 1..=SLICE_COUNT {
            pattern.push_str(&format!("{slice:>2}(.*)\\n"));
        }
        Regex::new(&pattern).expect("section pattern compiles")
    })
}

/// Parses one report file's contents into a report for `scanner`.
pub fn parse_report(
    scanner: &str,
    file_name: &str,
    contents: &str,
    zone: TimestampZone,
) -> Result<StabilityReport, ReportError> {
    let timestamp = parse_epoch(file_name, zone)?;

    let contents = contents.replace("\r\n", "\n");
    let (first_line, body) = contents
        .split_once('\n')
        .unwrap_or((contents.as_str(), ""));
    let coil = parse_configuration_line(first_line)?;

    let mut report = StabilityReport::new(
        scanner.to_string(),
        coil,
        file_name.to_string(),
        timestamp,
    );
    let prefix = report.key_prefix();

    for captures in section_pattern().captures_iter(body) {
        let section = &captures[1];
        let columns: Vec<String> = captures[2]
            .split_whitespace()
            .map(normalize_column_name)
            .collect();

        for slice in 1..=SLICE_COUNT {
            let row = &captures[slice + 2];
            for (column, token) in columns.iter().zip(row.split_whitespace()) {
                let value = parse_value(token).ok_or_else(|| ReportError::InvalidValue {
                    section: section.to_string(),
                    slice,
                    value: token.to_string(),
                })?;
                report.insert(format!("{prefix}.{column}.{section}.{slice}"), value);
            }
        }
    }

    Ok(report)
}

pub fn parse_configuration_line(line: &str) -> Result<HeadCoil, ReportError> {
    let channels = configuration_pattern()
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str())
        .ok_or_else(|| ReportError::ConfigurationLine {
            line: line.to_string(),
        })?;

    HeadCoil::from_channels(channels).ok_or_else(|| ReportError::UnknownChannels {
        channels: channels.to_string(),
    })
}

fn parse_value(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}
