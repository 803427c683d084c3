use crate::batch::report::{BatchReport, FileResult};
use crate::config::DiscoveryConfig;
use crate::converter::Converter;
use crate::error::Result;
use crate::scanner::{NotebookFile, NotebookScanner};
use crate::ui::GracefulShutdown;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Progress notifications emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Warning(&'a str),
    Discovered {
        directory: &'a Path,
        count: usize,
    },
    Started {
        index: usize,
        total: usize,
        notebook: &'a NotebookFile,
    },
    Finished {
        index: usize,
        total: usize,
        result: &'a FileResult,
    },
    Cancelled {
        remaining: usize,
    },
}

/// Invocations a run would perform, without performing them.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    pub invocations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Discovers notebooks and feeds them to a [`Converter`] one at a time.
pub struct BatchConverter<C: Converter> {
    converter: C,
    scanner: NotebookScanner,
    output_dir: Option<PathBuf>,
    shutdown: Option<GracefulShutdown>,
}

impl<C: Converter> BatchConverter<C> {
    pub fn new(converter: C, discovery: &DiscoveryConfig) -> Self {
        Self {
            converter,
            scanner: NotebookScanner::new(discovery),
            output_dir: None,
            shutdown: None,
        }
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_shutdown(mut self, shutdown: GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn output_dir_for(&self, directory: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| directory.to_path_buf())
    }

    /// Lists notebooks, turning a missing or unreadable directory into a warning.
    pub fn discover(&self, directory: &Path) -> Result<(Vec<NotebookFile>, Vec<String>)> {
        match self.scanner.scan_directory(directory) {
            Ok(scan) => Ok((scan.notebooks, scan.skipped)),
            Err(err) if err.is_discovery_miss() => {
                tracing::warn!("{}", err);
                Ok((Vec::new(), vec![err.to_string()]))
            }
            Err(err) => Err(err),
        }
    }

    pub fn plan(&self, directory: &Path) -> Result<BatchPlan> {
        let (notebooks, warnings) = self.discover(directory)?;
        let output_dir = self.output_dir_for(directory);

        let invocations = notebooks
            .iter()
            .map(|notebook| self.converter.describe(&notebook.path, &output_dir))
            .collect();

        Ok(BatchPlan {
            invocations,
            warnings,
        })
    }

    pub fn run(&self, directory: &Path) -> Result<BatchReport> {
        self.run_with_events(directory, |_| {})
    }

    /// Converts every discovered notebook exactly once, in path order.
    ///
    /// A failed conversion is recorded and the loop moves on; only discovery
    /// errors other than a missing directory end the run early.
    pub fn run_with_events<F>(&self, directory: &Path, mut on_event: F) -> Result<BatchReport>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let start_time = Instant::now();
        let output_dir = self.output_dir_for(directory);
        let mut report = BatchReport::new(directory, &output_dir);

        let (notebooks, warnings) = self.discover(directory)?;
        for warning in &warnings {
            on_event(BatchEvent::Warning(warning));
        }
        report.warnings = warnings;

        let total = notebooks.len();
        report.discovered = total;
        on_event(BatchEvent::Discovered {
            directory,
            count: total,
        });

        for (index, notebook) in notebooks.iter().enumerate() {
            if self.shutdown.as_ref().is_some_and(|s| !s.is_running()) {
                tracing::info!("Stopping before {}: interrupted", notebook.display_path());
                report.cancelled = true;
                on_event(BatchEvent::Cancelled {
                    remaining: total - index,
                });
                break;
            }

            on_event(BatchEvent::Started {
                index,
                total,
                notebook,
            });

            let file_start = Instant::now();
            let outcome = self.converter.convert(&notebook.path, &output_dir);
            let result = FileResult::new(notebook.path.clone(), outcome, file_start.elapsed());

            on_event(BatchEvent::Finished {
                index,
                total,
                result: &result,
            });
            report.results.push(result);
        }

        report.elapsed = start_time.elapsed();
        tracing::info!(
            "Batch finished: {} converted, {} failed",
            report.succeeded(),
            report.failed()
        );

        Ok(report)
    }
}
