use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    domain::utils::{is_report_file_name, ARCHIVE_DIR_NAME},
    errors::{AppError, ReportError},
};

const FALLBACK_SCANNER: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub path: PathBuf,
    pub file_name: String,
    pub scanner: String,
}

pub trait ReportSource {
    fn list_report_files(&self) -> Result<Vec<ReportFile>, AppError>;
    fn read_report(&self, file: &ReportFile) -> Result<String, ReportError>;
    fn archive_report(&self, file: &ReportFile) -> Result<PathBuf, ReportError>;
}

/// Reports stored on the local filesystem below a base directory.
#[derive(Debug, Clone)]
pub struct FsReportSource {
    base_dir: PathBuf,
    scan_root: PathBuf,
}

impl FsReportSource {
    pub fn new(base_dir: impl Into<PathBuf>, scan_root: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            scan_root: scan_root.into(),
        }
    }
}

impl ReportSource for FsReportSource {
    fn list_report_files(&self) -> Result<Vec<ReportFile>, AppError> {
        let entries = fs::read_dir(&self.scan_root)
            .map_err(|err| AppError::discovery(&self.scan_root, err))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| AppError::discovery(&self.scan_root, err))?;
            visit_entry(entry.path(), &mut candidates);
        }

        Ok(map_and_sort_report_files(&self.base_dir, candidates))
    }

    fn read_report(&self, file: &ReportFile) -> Result<String, ReportError> {
        fs::read_to_string(&file.path).map_err(|err| ReportError::io(&file.path, err))
    }

    fn archive_report(&self, file: &ReportFile) -> Result<PathBuf, ReportError> {
        let destination = archive_destination(&file.path);
        if let Some(archive_dir) = destination.parent() {
            fs::create_dir_all(archive_dir).map_err(|err| ReportError::io(archive_dir, err))?;
        }
        fs::rename(&file.path, &destination).map_err(|err| ReportError::io(&file.path, err))?;
        Ok(destination)
    }
}

fn visit_entry(path: PathBuf, candidates: &mut Vec<PathBuf>) {
    let metadata = match fs::symlink_metadata(&path) {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping unreadable entry");
            return;
        }
    };

    if metadata.is_dir() {
        if path.file_name().is_some_and(|name| name == ARCHIVE_DIR_NAME) {
            debug!(path = %path.display(), "skipping archive directory");
            return;
        }
        match fs::read_dir(&path) {
            Ok(entries) => visit_children(
                &path,
                entries.map(|entry| entry.map(|entry| entry.path())),
                candidates,
            ),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable directory");
            }
        }
    } else if path.is_file() {
        candidates.push(path);
    }
}

fn visit_children<I>(dir: &Path, children: I, candidates: &mut Vec<PathBuf>)
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    for child in children {
        match child {
            Ok(child) => visit_entry(child, candidates),
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "skipping unreadable entry");
            }
        }
    }
}

fn map_and_sort_report_files(base_dir: &Path, candidates: Vec<PathBuf>) -> Vec<ReportFile> {
    let mut files: Vec<ReportFile> = candidates
        .into_iter()
        .filter_map(|path| {
            let file_name = path.file_name()?.to_str()?.to_string();
            if !is_report_file_name(&file_name) {
                debug!(path = %path.display(), "ignoring non-report file");
                return None;
            }
            let scanner = scanner_identity(base_dir, path.parent()?);
            Some(ReportFile {
                path,
                file_name,
                scanner,
            })
        })
        .collect();

    files.sort_by(|left, right| left.path.cmp(&right.path));
    files
}

/// Dotted path of `dir` below `base_dir`, e.g. `Harvard.Northwest.Bay1`.
pub fn scanner_identity(base_dir: &Path, dir: &Path) -> String {
    let segments: Vec<String> = dir
        .strip_prefix(base_dir)
        .map(|relative| {
            relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    if !segments.is_empty() {
        return segments.join(".");
    }

    base_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            base_dir
                .canonicalize()
                .ok()
                .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| FALLBACK_SCANNER.to_string())
}

pub fn archive_destination(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let file_name = path.file_name().unwrap_or_default();
    parent.join(ARCHIVE_DIR_NAME).join(file_name)
}
