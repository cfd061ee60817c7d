use std::{
    env,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;

use crate::cli::Cli;

pub const BASE_DIR_ENV: &str = "BASEDIR";
pub const DEFAULT_LOG_FILE_NAME: &str = "mristability.log";

/// How naive date-times embedded in report file names are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub scan_root: PathBuf,
    pub archive: bool,
    pub verbose: bool,
    pub timestamp_zone: TimestampZone,
    pub compact: bool,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the following arguments are required: -b/--base-dir (or set BASEDIR)")]
    MissingBaseDir,
    #[error("base directory must not be empty")]
    EmptyBaseDir,
    #[error("base directory {} does not exist", .0.display())]
    BaseDirNotFound(PathBuf),
    #[error("base directory {} is not a directory", .0.display())]
    BaseDirNotDirectory(PathBuf),
    #[error("scanner directory {} does not exist", .0.display())]
    ScannerDirNotFound(PathBuf),
    #[error("scanner path {} must be relative to the base directory", .0.display())]
    InvalidScanner(PathBuf),
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        Self::from_cli_with_env(cli, |key| env::var(key).ok())
    }

    pub fn from_cli_with_env<F>(cli: Cli, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base_dir = match cli.base_dir {
            Some(path) => path.to_string_lossy().trim().to_string(),
            None => lookup(BASE_DIR_ENV)
                .map(|value| value.trim().to_string())
                .ok_or(ConfigError::MissingBaseDir)?,
        };
        if raw_base_dir.is_empty() {
            return Err(ConfigError::EmptyBaseDir);
        }

        let base_dir = PathBuf::from(raw_base_dir);
        ensure_directory(&base_dir)?;

        let scan_root = match cli.scanner {
            Some(scanner) => {
                ensure_relative_scanner(&scanner)?;
                let scan_root = base_dir.join(scanner);
                if !scan_root.is_dir() {
                    return Err(ConfigError::ScannerDirNotFound(scan_root));
                }
                scan_root
            }
            None => base_dir.clone(),
        };

        let log_file = if cli.no_log_file {
            None
        } else {
            Some(
                cli.log_file
                    .unwrap_or_else(|| base_dir.join(DEFAULT_LOG_FILE_NAME)),
            )
        };

        Ok(Self {
            base_dir,
            scan_root,
            archive: cli.archive,
            verbose: cli.verbose,
            timestamp_zone: if cli.utc {
                TimestampZone::Utc
            } else {
                TimestampZone::Local
            },
            compact: cli.compact,
            log_file,
        })
    }
}

fn ensure_directory(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::BaseDirNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ConfigError::BaseDirNotDirectory(path.to_path_buf()));
    }
    Ok(())
}

/// A scanner path may only name directories below the base directory.
fn ensure_relative_scanner(scanner: &Path) -> Result<(), ConfigError> {
    let mut components = scanner.components().peekable();
    if components.peek().is_none()
        || !components.all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(ConfigError::InvalidScanner(scanner.to_path_buf()));
    }
    Ok(())
}
