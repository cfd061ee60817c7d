use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to scan {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write report output: {message}")]
    Output { message: String },
}

impl AppError {
    pub fn discovery(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Discovery {
            path: path.into(),
            source,
        }
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }
}

/// Line printed on stderr for a fatal error, independent of log filtering.
pub fn diagnostic(err: &dyn std::error::Error) -> String {
    format!("mristability: error: {err}")
}

/// Failure to turn one report file into a report. Never fatal for the run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file name {name:?} does not match the stability report pattern")]
    FileName { name: String },
    #[error("invalid timestamp {value:?} in file name: {message}")]
    Timestamp { value: String, message: String },
    #[error("could not parse channels from configuration line {line:?}")]
    ConfigurationLine { line: String },
    #[error("no coil mapped for number of channels {channels}")]
    UnknownChannels { channels: String },
    #[error("invalid value {value:?} in {section} results, slice {slice}")]
    InvalidValue {
        section: String,
        slice: usize,
        value: String,
    },
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
