use crate::converter::ConversionOutcome;
use crate::error::{NbBatchError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub notebook: PathBuf,
    #[serde(flatten)]
    pub outcome: ConversionOutcome,
    pub duration: Duration,
}

impl FileResult {
    pub fn new(notebook: PathBuf, outcome: ConversionOutcome, duration: Duration) -> Self {
        Self {
            notebook,
            outcome,
            duration,
        }
    }

    pub fn display_path(&self) -> String {
        self.notebook.display().to_string()
    }
}

/// Structured result of one batch run, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub output_directory: PathBuf,
    pub discovered: usize,
    pub results: Vec<FileResult>,
    pub warnings: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn new(directory: &Path, output_directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            output_directory: output_directory.to_path_buf(),
            discovered: 0,
            results: Vec::new(),
            warnings: Vec::new(),
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            cancelled: false,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| !r.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| !r.outcome.is_success())
    }

    /// Notebooks that were discovered but never attempted.
    pub fn skipped(&self) -> usize {
        self.discovered.saturating_sub(self.results.len())
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        fs::write(path, json).map_err(|e| NbBatchError::Report {
            message: format!("{}: {}", path.display(), e),
        })?;

        tracing::info!("Wrote conversion report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_report() -> BatchReport {
        let mut report = BatchReport::new(Path::new("chapters"), Path::new("chapters"));
        report.discovered = 3;
        report.results.push(FileResult::new(
            PathBuf::from("chapters/intro.ipynb"),
            ConversionOutcome::Success,
            Duration::from_millis(120),
        ));
        report.results.push(FileResult::new(
            PathBuf::from("chapters/broken.ipynb"),
            ConversionOutcome::failure("NotJSONError"),
            Duration::from_millis(40),
        ));
        report
    }

    #[test]
    fn test_counts() {
        let report = create_test_report();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(report.has_failures());

        let failures: Vec<_> = report.failures().map(|r| r.display_path()).collect();
        assert_eq!(failures, vec!["chapters/broken.ipynb"]);
    }

    #[test]
    fn test_empty_report() {
        let report = BatchReport::new(Path::new("chapters"), Path::new("chapters"));
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 0);
        assert!(!report.has_failures());
        assert!(!report.cancelled);
    }

    #[test]
    fn test_report_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");

        create_test_report().save_json(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["discovered"], 3);
        assert_eq!(json["results"][0]["status"], "success");
        assert_eq!(json["results"][1]["status"], "failure");
        assert_eq!(json["results"][1]["message"], "NotJSONError");
        assert_eq!(json["results"][1]["notebook"], "chapters/broken.ipynb");
    }

    #[test]
    fn test_report_json_unwritable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("report.json");

        let result = create_test_report().save_json(&path);
        assert!(matches!(result, Err(NbBatchError::Report { .. })));
    }
}
