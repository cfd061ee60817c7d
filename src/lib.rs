use std::io::Write;

use tracing::info;

pub mod cli;
pub mod collector;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod output;
pub mod report_source;

use collector::{CollectorOptions, StabilityCollector};
use config::Config;
use errors::AppError;
use report_source::FsReportSource;

/// Collects every report under the configured tree and writes the JSON
/// document to `writer` once all files have been processed.
pub fn run<W: Write>(config: &Config, writer: &mut W) -> Result<(), AppError> {
    let source = FsReportSource::new(&config.base_dir, &config.scan_root);
    let collector = StabilityCollector::new(
        source,
        CollectorOptions {
            archive: config.archive,
            timestamp_zone: config.timestamp_zone,
        },
    );

    let collection = collector.collect()?;
    info!(
        scan_root = %config.scan_root.display(),
        reports = collection.reports.len(),
        skipped = collection.skipped,
        "collection finished"
    );

    output::write_reports(writer, &collection.reports, config.compact)
}
