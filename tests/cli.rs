use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

const SAMPLE: &str = include_str!("fixtures/Stability_2024-03-01T07-30-00.txt");

struct ReportTree {
    tmp: TempDir,
}

impl ReportTree {
    fn new() -> Self {
        Self {
            tmp: TempDir::new().expect("create temp dir"),
        }
    }

    fn base(&self) -> &Path {
        self.tmp.path()
    }

    fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.base().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create report dir");
        }
        fs::write(&path, contents).expect("write report");
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mristability").expect("binary is built");
        cmd.env_remove("BASEDIR").env_remove("RUST_LOG");
        cmd
    }

    fn run_json(&self, extra: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--base-dir")
            .arg(self.base())
            .args(["--utc", "--no-log-file"])
            .args(extra)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

#[test]
fn emits_one_entry_per_valid_report() {
    let tree = ReportTree::new();
    tree.write("Harvard/Northwest/Bay1/Stability_2024-03-01T07-30-00.txt", SAMPLE);
    tree.write("Harvard/Northwest/Bay1/Stability_2024-03-08T07-30-00.txt", SAMPLE);
    tree.write("Harvard/Southeast/Bay2/Stability_2024-03-01T09-00-00.txt", SAMPLE);
    tree.write("Harvard/Northwest/Bay1/notes.txt", "not a report");

    let output = tree.run_json(&[]);
    let reports = output.as_array().expect("array output");
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["scanner"], "Harvard.Northwest.Bay1");
    assert_eq!(reports[0]["filename"], "Stability_2024-03-01T07-30-00.txt");
    assert_eq!(reports[0]["Harvard.Northwest.Bay1.64.SNR.Phantom.2"], 202.0);
    assert_eq!(reports[2]["scanner"], "Harvard.Southeast.Bay2");
    assert_eq!(reports[2]["Harvard.Southeast.Bay2.64.driftpct.Phantom.10"], 0.1);
}

#[test]
fn malformed_reports_are_skipped() {
    let tree = ReportTree::new();
    tree.write("Bay1/Stability_2024-03-01T07-30-00.txt", SAMPLE);
    tree.write(
        "Bay1/Stability_2024-03-02T07-30-00.txt",
        "Stability configuration: 16 slices, 500 measurements, 20 channels\n",
    );
    tree.write("Bay1/Stability_2024-03-03T07-30-00.txt", "random text");

    let output = tree.run_json(&[]);
    let reports = output.as_array().expect("array output");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["filename"], "Stability_2024-03-01T07-30-00.txt");
}

#[test]
fn tree_without_reports_prints_empty_array() {
    let tree = ReportTree::new();
    let output = tree.run_json(&[]);
    assert_eq!(output, Value::Array(vec![]));
}

#[test]
fn basedir_env_is_used_when_flag_is_missing() {
    let tree = ReportTree::new();
    tree.write("Bay1/Stability_2024-03-01T07-30-00.txt", SAMPLE);

    tree.cmd()
        .env("BASEDIR", tree.base())
        .args(["--utc", "--no-log-file", "--compact"])
        .assert()
        .success()
        .stdout(contains("\"scanner\":\"Bay1\""));
}

#[test]
fn missing_base_dir_is_fatal() {
    let tree = ReportTree::new();
    tree.cmd()
        .assert()
        .failure()
        .code(1)
        .stderr(contains("--base-dir"));
}

#[test]
fn empty_base_dir_is_fatal() {
    let tree = ReportTree::new();
    tree.cmd()
        .env("BASEDIR", "")
        .assert()
        .failure()
        .stderr(contains("must not be empty"));
}

#[test]
fn nonexistent_base_dir_is_fatal() {
    let tree = ReportTree::new();
    tree.cmd()
        .arg("--base-dir")
        .arg(tree.base().join("missing"))
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("does not exist"));
}

#[test]
fn archive_moves_processed_reports() {
    let tree = ReportTree::new();
    let report = tree.write("Bay1/Stability_2024-03-01T07-30-00.txt", SAMPLE);

    let first = tree.run_json(&["--archive"]);
    assert_eq!(first.as_array().map(Vec::len), Some(1));
    assert!(!report.exists());
    assert!(tree
        .base()
        .join("Bay1/Processed/Stability_2024-03-01T07-30-00.txt")
        .exists());

    let second = tree.run_json(&["--archive"]);
    assert_eq!(second, Value::Array(vec![]));
}

#[test]
fn without_archive_files_stay_in_place() {
    let tree = ReportTree::new();
    let report = tree.write("Bay1/Stability_2024-03-01T07-30-00.txt", SAMPLE);

    tree.run_json(&[]);
    assert!(report.exists());
    assert!(!tree.base().join("Bay1/Processed").exists());
}

#[test]
fn scanner_flag_limits_discovery() {
    let tree = ReportTree::new();
    tree.write("Harvard/Northwest/Bay1/Stability_2024-03-01T07-30-00.txt", SAMPLE);
    tree.write("Harvard/Southeast/Bay2/Stability_2024-03-01T07-30-00.txt", SAMPLE);

    let output = tree.run_json(&["--scanner", "Harvard/Southeast/Bay2"]);
    let reports = output.as_array().expect("array output");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["scanner"], "Harvard.Southeast.Bay2");
}

#[test]
fn scanner_outside_base_dir_is_fatal() {
    let tree = ReportTree::new();
    let elsewhere = ReportTree::new();
    elsewhere.write("Elsewhere/Bay9/Stability_2024-03-01T07-30-00.txt", SAMPLE);

    tree.cmd()
        .arg("--base-dir")
        .arg(tree.base())
        .arg("--scanner")
        .arg(elsewhere.base().join("Elsewhere/Bay9"))
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("must be relative to the base directory"));

    tree.cmd()
        .arg("--base-dir")
        .arg(tree.base())
        .args(["--scanner", "../"])
        .assert()
        .failure()
        .stderr(contains("must be relative to the base directory"));
}

#[test]
fn logs_go_to_stderr_and_log_file() {
    let tree = ReportTree::new();
    tree.write("Bay1/Stability_2024-03-01T07-30-00.txt", SAMPLE);

    let assert = tree
        .cmd()
        .arg("--base-dir")
        .arg(tree.base())
        .args(["--utc", "--verbose"])
        .assert()
        .success()
        .stderr(contains("processing file"));

    let stdout = assert.get_output().stdout.clone();
    let parsed: Value = serde_json::from_slice(&stdout).expect("stdout is pure json");
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));

    let log_path = fs::read_dir(tree.base())
        .expect("read base dir")
        .flatten()
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with("mristability.log."))
        })
        .expect("daily log file written");
    let log = fs::read_to_string(log_path).expect("read log file");
    assert!(log.contains("parsed report"));
}
