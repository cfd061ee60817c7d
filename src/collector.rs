use tracing::{debug, error, info};

use crate::{
    config::TimestampZone,
    domain::{parser::parse_report, report::StabilityReport},
    errors::{AppError, ReportError},
    report_source::{archive_destination, ReportFile, ReportSource},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectorOptions {
    pub archive: bool,
    pub timestamp_zone: TimestampZone,
}

#[derive(Debug, Default)]
pub struct Collection {
    pub reports: Vec<StabilityReport>,
    pub skipped: usize,
}

pub struct StabilityCollector<S> {
    source: S,
    options: CollectorOptions,
}

impl<S: ReportSource> StabilityCollector<S> {
    pub fn new(source: S, options: CollectorOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parses every discovered report. Files that fail are logged and skipped;
    /// only a failure to enumerate the tree itself is returned.
    pub fn collect(&self) -> Result<Collection, AppError> {
        let files = self.source.list_report_files()?;
        if files.is_empty() {
            info!("no new report files found");
            return Ok(Collection::default());
        }
        debug!(count = files.len(), "discovered report files");

        let mut collection = Collection::default();
        for file in &files {
            match self.process_file(file) {
                Ok(report) => {
                    self.archive_file(file);
                    collection.reports.push(report);
                }
                Err(err) => {
                    error!(path = %file.path.display(), error = %err, "skipping report file");
                    collection.skipped += 1;
                }
            }
        }

        Ok(collection)
    }

    fn process_file(&self, file: &ReportFile) -> Result<StabilityReport, ReportError> {
        info!(path = %file.path.display(), "processing file");
        let contents = self.source.read_report(file)?;
        let report = parse_report(
            &file.scanner,
            &file.file_name,
            &contents,
            self.options.timestamp_zone,
        )?;
        debug!(
            path = %file.path.display(),
            timestamp = report.timestamp,
            measurements = report.measurements().len(),
            "parsed report"
        );
        Ok(report)
    }

    fn archive_file(&self, file: &ReportFile) {
        if !self.options.archive {
            info!(
                source = %file.path.display(),
                destination = %archive_destination(&file.path).display(),
                "pass --archive to move processed report"
            );
            return;
        }

        match self.source.archive_report(file) {
            Ok(destination) => info!(
                source = %file.path.display(),
                destination = %destination.display(),
                "archived report"
            ),
            Err(err) => error!(path = %file.path.display(), error = %err, "failed to archive report"),
        }
    }
}
