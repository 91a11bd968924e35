//! Result writer: picks the output file and serializes evaluation records to CSV.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::attributes::INVALID_FORMAT;
use crate::errors::HarnessError;
use crate::evaluator::EvaluationRecord;

const FIXED_OUTPUT_NAME: &str = "output.csv";

/// How the output file is named inside the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputNaming {
    /// `output.csv`, overwritten every run.
    Fixed,
    /// `output_<YYYYMMDD_HHMMSS>.csv`, never overwriting an existing file.
    Timestamped,
}

impl FromStr for OutputNaming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(OutputNaming::Fixed),
            "timestamped" => Ok(OutputNaming::Timestamped),
            other => Err(format!("expected 'fixed' or 'timestamped', got '{other}'")),
        }
    }
}

/// Resolves the output path for a run started at `now`.
///
/// With timestamped naming an existing file is never reused: `_1`, `_2`, …
/// is appended until a free name is found.
pub fn output_path(dir: &Path, naming: OutputNaming, now: NaiveDateTime) -> PathBuf {
    match naming {
        OutputNaming::Fixed => dir.join(FIXED_OUTPUT_NAME),
        OutputNaming::Timestamped => {
            let stem = format!("output_{}", now.format("%Y%m%d_%H%M%S"));
            let mut candidate = dir.join(format!("{stem}.csv"));
            let mut suffix = 1;
            while candidate.exists() {
                candidate = dir.join(format!("{stem}_{suffix}.csv"));
                suffix += 1;
            }
            candidate
        }
    }
}

/// Writes the header and one row per record. Creates the parent directory if needed.
pub fn write_report(
    path: &Path,
    records: &[EvaluationRecord],
    naming: OutputNaming,
) -> Result<(), HarnessError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| HarnessError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    match naming {
        OutputNaming::Fixed => options.create(true).truncate(true),
        OutputNaming::Timestamped => options.create_new(true),
    };

    let file = options.open(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);
    if records.is_empty() {
        writer.write_record([
            "chat_history",
            "expected_attributes",
            "actual_attributes",
            "status",
        ])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Aggregate counts for the end-of-run log line.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub invalid_format: usize,
}

impl RunSummary {
    pub fn from_records(records: &[EvaluationRecord]) -> Self {
        let passed = records.iter().filter(|r| r.status.is_pass()).count();
        let invalid_format = records
            .iter()
            .filter(|r| r.actual_attributes == INVALID_FORMAT)
            .count();

        Self {
            total: records.len(),
            passed,
            failed: records.len() - passed,
            invalid_format,
        }
    }

    /// Percentage of passing rows; 0 for an empty run.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 * 100.0 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Verdict;
    use chrono::NaiveDate;
    use std::io::ErrorKind;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record(chat: &str, actual: &str, status: Verdict) -> EvaluationRecord {
        EvaluationRecord {
            chat_history: chat.to_string(),
            expected_attributes: "Email: N/A | Phone: N/A | Move date: N/A".to_string(),
            actual_attributes: actual.to_string(),
            status,
        }
    }

    #[test]
    fn test_fixed_path() {
        let path = output_path(Path::new("results"), OutputNaming::Fixed, at(1, 2, 3));
        assert_eq!(path, PathBuf::from("results/output.csv"));
    }

    #[test]
    fn test_timestamped_path_format() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = output_path(dir.path(), OutputNaming::Timestamped, at(14, 5, 9));
        assert_eq!(path, dir.path().join("output_20240309_140509.csv"));
    }

    #[test]
    fn test_timestamped_path_skips_existing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("output_20240309_140509.csv"), "old").unwrap();
        std::fs::write(dir.path().join("output_20240309_140509_1.csv"), "old").unwrap();

        let path = output_path(dir.path(), OutputNaming::Timestamped, at(14, 5, 9));
        assert_eq!(path, dir.path().join("output_20240309_140509_2.csv"));
    }

    #[test]
    fn test_report_columns_and_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("output.csv");
        let records = vec![
            record("hello, there", "Email: N/A | Phone: N/A | Move date: N/A", Verdict::Pass),
            record("second", INVALID_FORMAT, Verdict::Fail),
        ];

        write_report(&path, &records, OutputNaming::Fixed).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                "chat_history,expected_attributes,actual_attributes,status",
                "\"hello, there\",Email: N/A | Phone: N/A | Move date: N/A,Email: N/A | Phone: N/A | Move date: N/A,TRUE",
                "second,Email: N/A | Phone: N/A | Move date: N/A,Invalid format,FALSE",
            ]
        );
    }

    #[test]
    fn test_empty_report_still_has_header() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("output.csv");

        write_report(&path, &[], OutputNaming::Fixed).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "chat_history,expected_attributes,actual_attributes,status\n"
        );
    }

    #[test]
    fn test_fixed_naming_overwrites() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("output.csv");
        std::fs::write(&path, "stale contents that are much longer than the new report\n").unwrap();

        write_report(&path, &[], OutputNaming::Fixed).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "chat_history,expected_attributes,actual_attributes,status\n"
        );
    }

    #[test]
    fn test_timestamped_naming_refuses_existing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("output_20240309_140509.csv");
        std::fs::write(&path, "previous run").unwrap();

        let err = write_report(&path, &[], OutputNaming::Timestamped).unwrap_err();
        match err {
            HarnessError::Io { source, .. } => assert_eq!(source.kind(), ErrorKind::AlreadyExists),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run");
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            record("a", "x", Verdict::Pass),
            record("b", INVALID_FORMAT, Verdict::Fail),
            record("c", "y", Verdict::Fail),
            record("d", "z", Verdict::Pass),
        ];

        let summary = RunSummary::from_records(&records);
        assert_eq!(
            summary,
            RunSummary {
                total: 4,
                passed: 2,
                failed: 2,
                invalid_format: 1,
            }
        );
        assert!((summary.pass_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary_pass_rate_is_zero() {
        assert_eq!(RunSummary::from_records(&[]).pass_rate(), 0.0);
    }
}
